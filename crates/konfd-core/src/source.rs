//! Template sources and their destinations
//!
//! A template source is a ConfigMap labelled `konfd.io/template=true`. Its
//! `template` data entry holds the template text, and three annotations say
//! where the rendered value goes:
//!
//! ```yaml
//! metadata:
//!   labels:
//!     konfd.io/template: "true"
//!   annotations:
//!     konfd.io/kind: secret
//!     konfd.io/name: app-env
//!     konfd.io/key: DATABASE_URL
//! data:
//!   template: 'postgres://{{ secret("db", "user") }}@{{ configmap("db", "host") }}'
//! ```

use std::collections::BTreeMap;

use crate::error::{CoreError, Result};
use crate::kind::ResourceKind;

/// Label and annotation keys understood by konfd
pub mod keys {
    /// Label selecting template sources
    pub const TEMPLATE_LABEL: &str = "konfd.io/template";
    /// Label value selecting template sources
    pub const TEMPLATE_LABEL_VALUE: &str = "true";
    /// Destination object name
    pub const NAME: &str = "konfd.io/name";
    /// Destination data key
    pub const KEY: &str = "konfd.io/key";
    /// Destination kind (`configmap` or `secret`)
    pub const KIND: &str = "konfd.io/kind";
    /// Data entry holding the template text
    pub const TEMPLATE_DATA_KEY: &str = "template";
}

/// Label selector used to list template sources
pub fn template_selector() -> String {
    format!("{}={}", keys::TEMPLATE_LABEL, keys::TEMPLATE_LABEL_VALUE)
}

/// Where a rendered template is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub kind: ResourceKind,
    pub name: String,
    pub key: String,
}

/// A template and its destination, read from a template ConfigMap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSource {
    pub namespace: String,
    pub name: String,
    pub template: String,
    pub destination: Destination,
}

impl TemplateSource {
    /// Build a template source from an object's annotations and data
    pub fn parse(
        namespace: &str,
        name: &str,
        annotations: Option<&BTreeMap<String, String>>,
        data: Option<&BTreeMap<String, String>>,
    ) -> Result<Self> {
        let template = data
            .and_then(|d| d.get(keys::TEMPLATE_DATA_KEY))
            .ok_or_else(|| CoreError::MissingTemplate {
                namespace: namespace.to_string(),
                name: name.to_string(),
                key: keys::TEMPLATE_DATA_KEY.to_string(),
            })?;

        let annotation = |key: &str| -> Result<String> {
            annotations
                .and_then(|a| a.get(key))
                .filter(|v| !v.is_empty())
                .cloned()
                .ok_or_else(|| CoreError::MissingAnnotation {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    annotation: key.to_string(),
                })
        };

        let kind: ResourceKind = annotation(keys::KIND)?.parse()?;

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            template: template.clone(),
            destination: Destination {
                kind,
                name: annotation(keys::NAME)?,
                key: annotation(keys::KEY)?,
            },
        })
    }
}
