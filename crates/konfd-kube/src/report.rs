//! Results of a sync pass

use konfd_core::Destination;
use tracing::info;

use crate::error::{KubeError, SyncError};
use crate::reconciler::ApplyOutcome;

/// One template applied to its destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOutcome {
    pub template: String,
    pub destination: Destination,
    pub outcome: ApplyOutcome,
}

/// One template that could not be synced
#[derive(Debug)]
pub struct TemplateFailure {
    pub template: String,
    pub error: SyncError,
}

/// Everything that happened in one namespace during a pass
#[derive(Debug, Default)]
pub struct NamespaceReport {
    pub namespace: String,
    pub synced: Vec<TemplateOutcome>,
    pub failed: Vec<TemplateFailure>,
    /// Named templates that do not exist in this namespace
    pub skipped: Vec<String>,
    /// Set when the templates of the namespace could not be listed
    pub error: Option<KubeError>,
}

impl NamespaceReport {
    pub fn new(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.error.is_none()
    }

    /// Failed templates, counting an unlistable namespace as one failure
    pub fn failure_count(&self) -> usize {
        self.failed.len() + usize::from(self.error.is_some())
    }
}

/// Everything that happened during one pass
#[derive(Debug, Default)]
pub struct PassReport {
    pub namespaces: Vec<NamespaceReport>,
    /// Set when the namespaces could not be listed
    pub error: Option<KubeError>,
}

impl PassReport {
    pub fn synced_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.synced.len()).sum()
    }

    pub fn changed_count(&self) -> usize {
        self.namespaces
            .iter()
            .flat_map(|ns| &ns.synced)
            .filter(|t| t.outcome.changed())
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.namespaces
            .iter()
            .map(NamespaceReport::failure_count)
            .sum::<usize>()
            + usize::from(self.error.is_some())
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// Log a one-line summary
    pub fn log_summary(&self) {
        info!(
            namespaces = self.namespaces.len(),
            synced = self.synced_count(),
            changed = self.changed_count(),
            failed = self.failure_count(),
            "sync pass finished"
        );
    }
}
