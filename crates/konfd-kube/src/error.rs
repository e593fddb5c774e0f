//! Error types for konfd-kube

use konfd_core::{CoreError, ResourceKind};
use konfd_engine::EngineError;
use thiserror::Error;

/// Result type for konfd-kube operations
pub type Result<T> = std::result::Result<T, KubeError>;

/// Errors that can occur talking to the cluster
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KubeError {
    /// Kubernetes API error outside of object reads and writes
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// Kubeconfig or in-cluster configuration could not be loaded
    #[error("failed to load Kubernetes configuration: {0}")]
    Config(#[from] kube::config::InferConfigError),

    /// The object does not exist
    #[error("{kind} '{name}' not found in namespace '{namespace}'")]
    NotFound {
        kind: ResourceKind,
        namespace: String,
        name: String,
    },

    /// Reading from the cluster failed for a reason other than absence
    #[error("error fetching {target}: {message}")]
    Fetch { target: String, message: String },

    /// Creating or updating a destination failed
    #[error("error {action} {kind} '{name}' in namespace '{namespace}': {message}")]
    Reconcile {
        action: &'static str,
        kind: ResourceKind,
        namespace: String,
        name: String,
        message: String,
    },

    /// An object could not be serialized or lacks required metadata
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error while writing dry-run output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KubeError {
    /// Whether this is an absence rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for KubeError {
    fn from(err: serde_json::Error) -> Self {
        KubeError::Serialization(err.to_string())
    }
}

/// Failure to sync one template source
#[derive(Debug, Error)]
pub enum SyncError {
    /// The template ConfigMap is malformed
    #[error(transparent)]
    Source(#[from] CoreError),

    /// The template failed to parse or execute
    #[error("template '{template}': {error}")]
    Render {
        template: String,
        #[source]
        error: EngineError,
    },

    /// An object referenced by the template could not be fetched
    #[error("error executing template '{template}': {error}")]
    Reference {
        template: String,
        #[source]
        error: KubeError,
    },

    /// Reading the source or writing the destination failed
    #[error(transparent)]
    Kube(#[from] KubeError),
}

impl SyncError {
    /// Whether the underlying failure is a missing object
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Reference { error, .. } | Self::Kube(error) => error.is_not_found(),
            _ => false,
        }
    }

    /// The render failure, if this error came from the engine
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            Self::Render { error, .. } => Some(error),
            _ => None,
        }
    }
}
