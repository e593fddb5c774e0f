//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("unknown resource kind `{kind}` (expected `configmap` or `secret`)")]
    UnknownKind { kind: String },

    #[error("template source {namespace}/{name} is missing the `{key}` data entry")]
    MissingTemplate {
        namespace: String,
        name: String,
        key: String,
    },

    #[error("template source {namespace}/{name} is missing the `{annotation}` annotation")]
    MissingAnnotation {
        namespace: String,
        name: String,
        annotation: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to parse configuration: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
