//! The function surface available to templates
//!
//! Templates can call exactly two functions:
//!
//! - `configmap(name, key)`: the value of `key` in ConfigMap `name`
//! - `secret(name, key)`: the decoded value of `key` in Secret `name`
//!
//! Both are backed by a [`TemplateFunctions`] implementation injected into
//! the engine for each render.

use konfd_core::{DecodeError, ResourceKind};
use minijinja::{Environment, Error, ErrorKind};
use std::sync::Arc;
use thiserror::Error;

/// Lookups backing the `configmap` and `secret` template functions
pub trait TemplateFunctions: Send + Sync {
    /// Raw value of `key` in the named ConfigMap
    fn configmap(&self, name: &str, key: &str) -> Result<String, LookupError>;

    /// Decoded value of `key` in the named Secret
    fn secret(&self, name: &str, key: &str) -> Result<String, LookupError>;
}

/// Failure of a template function call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The object has not been fetched in this pass yet
    #[error("{kind} {name} has not been fetched")]
    Unresolved { kind: ResourceKind, name: String },

    /// The object exists but has no such key
    #[error("missing key `{key}` in {kind} {name}")]
    MissingKey {
        kind: ResourceKind,
        name: String,
        key: String,
    },

    /// The stored Secret value is not valid encoded text
    #[error("cannot decode key `{key}` in secret {name}: {source}")]
    Decode {
        name: String,
        key: String,
        #[source]
        source: DecodeError,
    },
}

/// Register `configmap` and `secret` on an environment
pub fn register(env: &mut Environment<'_>, functions: Arc<dyn TemplateFunctions>) {
    let configmaps = Arc::clone(&functions);
    env.add_function(
        "configmap",
        move |name: String, key: String| -> Result<String, Error> {
            configmaps.configmap(&name, &key).map_err(into_template_error)
        },
    );

    env.add_function(
        "secret",
        move |name: String, key: String| -> Result<String, Error> {
            functions.secret(&name, &key).map_err(into_template_error)
        },
    );
}

/// Wrap a lookup failure so it survives as the render error's source
fn into_template_error(err: LookupError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
}

/// Find the lookup failure behind a render error, if any
pub(crate) fn lookup_cause(err: &Error) -> Option<LookupError> {
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(lookup) = cause.downcast_ref::<LookupError>() {
            return Some(lookup.clone());
        }
        source = cause.source();
    }
    None
}
