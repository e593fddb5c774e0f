//! CLI error types with exit code handling
//!
//! This module provides a unified error type for the agent that
//! maps errors to appropriate exit codes.

use konfd_core::CoreError;
use konfd_kube::KubeError;
use miette::Diagnostic;
use std::path::Path;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Settings from flags, environment or file are unusable
    #[error("Configuration error: {message}")]
    #[diagnostic(code(konfd::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The cluster could not be reached
    #[error("Kubernetes error: {message}")]
    #[diagnostic(
        code(konfd::cli::kubernetes),
        help("Check KUBECONFIG or the in-cluster service account")
    )]
    Kubernetes { message: String },

    /// A single pass finished with failures
    #[error("Sync failed for {failed} template(s)")]
    #[diagnostic(code(konfd::cli::sync), help("See the log above for each failure"))]
    SyncFailed { failed: usize },

    /// The one template a single-target run was asked for failed
    #[error("Template {namespace}/{template} failed: {message}")]
    #[diagnostic(code(konfd::cli::template))]
    Template {
        namespace: String,
        template: String,
        message: String,
    },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(konfd::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Kubernetes { .. } => exit_codes::CLUSTER_ERROR,
            CliError::SyncFailed { .. } | CliError::Template { .. } => exit_codes::SYNC_FAILED,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a configuration error for a file that could not be loaded
    pub fn config_file(path: &Path, err: CoreError) -> Self {
        Self::Config {
            message: format!("cannot load {}: {}", path.display(), err),
            help: Some("The file is YAML with camelCase keys, e.g. `syncInterval: 60s`".to_string()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::Config {
            message: err.to_string(),
            help: None,
        }
    }
}

impl From<KubeError> for CliError {
    fn from(err: KubeError) -> Self {
        CliError::Kubernetes {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
