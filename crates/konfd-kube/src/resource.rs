//! ConfigMaps and Secrets as konfd sees them
//!
//! A [`Resource`] wraps the untyped object returned by the API server, so an
//! update writes back every field it was read with and only touches the
//! `data` entries konfd owns.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::core::{DynamicObject, TypeMeta};
use konfd_core::{encoding, ResourceKind, TemplateSource};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Type of the Secrets konfd creates
pub const SECRET_TYPE: &str = "Opaque";

/// A ConfigMap or Secret
#[derive(Debug, Clone)]
pub struct Resource {
    kind: ResourceKind,
    object: DynamicObject,
}

impl Resource {
    /// An empty object of the given kind
    pub fn new(kind: ResourceKind, namespace: &str, name: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("data".to_string(), Value::Object(Map::new()));
        if kind == ResourceKind::Secret {
            fields.insert("type".to_string(), Value::String(SECRET_TYPE.to_string()));
        }

        Self {
            kind,
            object: DynamicObject {
                types: Some(TypeMeta {
                    api_version: "v1".to_string(),
                    kind: kind.api_kind().to_string(),
                }),
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    namespace: Some(namespace.to_string()),
                    ..Default::default()
                },
                data: Value::Object(fields),
            },
        }
    }

    /// Wrap an object read from the cluster
    pub fn from_object(kind: ResourceKind, object: DynamicObject) -> Self {
        Self { kind, object }
    }

    /// Add a stored value, builder style
    pub fn with_value(mut self, key: &str, stored: impl Into<String>) -> Self {
        self.set_value(key, stored);
        self
    }

    /// Add labels, builder style
    pub fn with_labels(mut self, labels: &[(&str, &str)]) -> Self {
        let map = self.object.metadata.labels.get_or_insert_with(BTreeMap::new);
        for (k, v) in labels {
            map.insert(k.to_string(), v.to_string());
        }
        self
    }

    /// Add annotations, builder style
    pub fn with_annotations(mut self, annotations: &[(&str, &str)]) -> Self {
        let map = self
            .object
            .metadata
            .annotations
            .get_or_insert_with(BTreeMap::new);
        for (k, v) in annotations {
            map.insert(k.to_string(), v.to_string());
        }
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        self.object.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.object.metadata.namespace.as_deref().unwrap_or_default()
    }

    pub fn annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.object.metadata.annotations.as_ref()
    }

    pub fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.object.metadata.labels.as_ref()
    }

    /// Whether a label is set to the given value
    pub fn has_label(&self, key: &str, value: &str) -> bool {
        self.labels()
            .and_then(|labels| labels.get(key))
            .is_some_and(|v| v == value)
    }

    /// The stored value at `key`, as kept in the object
    ///
    /// Secret values are returned in their encoded form.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.object
            .data
            .get("data")
            .and_then(|data| data.get(key))
            .and_then(Value::as_str)
    }

    /// Overwrite or insert the stored value at `key`
    pub fn set_value(&mut self, key: &str, stored: impl Into<String>) {
        if !self.object.data.is_object() {
            self.object.data = Value::Object(Map::new());
        }
        if let Value::Object(fields) = &mut self.object.data {
            let data = fields
                .entry("data")
                .or_insert_with(|| Value::Object(Map::new()));
            if !data.is_object() {
                *data = Value::Object(Map::new());
            }
            if let Value::Object(entries) = data {
                entries.insert(key.to_string(), Value::String(stored.into()));
            }
        }
    }

    /// All string entries of `data`
    pub fn data(&self) -> BTreeMap<String, String> {
        self.object
            .data
            .get("data")
            .and_then(Value::as_object)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A top-level field other than metadata, such as `type` or `binaryData`
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.object.data.get(name)
    }

    /// Read this object as a template source
    pub fn template_source(&self) -> konfd_core::Result<TemplateSource> {
        TemplateSource::parse(
            self.namespace(),
            self.name(),
            self.annotations(),
            Some(&self.data()),
        )
    }

    pub fn object(&self) -> &DynamicObject {
        &self.object
    }

    pub fn into_object(self) -> DynamicObject {
        self.object
    }
}

/// The form in which `value` is stored in an object of `kind`
pub fn stored_value(kind: ResourceKind, value: &str) -> String {
    if kind.is_encoded() {
        encoding::encode(value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_configmap() {
        let cm = Resource::new(ResourceKind::ConfigMap, "prod", "app").with_value("k", "v");
        assert_eq!(cm.kind(), ResourceKind::ConfigMap);
        assert_eq!(cm.name(), "app");
        assert_eq!(cm.namespace(), "prod");
        assert_eq!(cm.value("k"), Some("v"));
        assert!(cm.field("type").is_none());

        let types = cm.object().types.as_ref().unwrap();
        assert_eq!(types.kind, "ConfigMap");
        assert_eq!(types.api_version, "v1");
    }

    #[test]
    fn test_new_secret_is_opaque() {
        let secret = Resource::new(ResourceKind::Secret, "prod", "creds");
        assert_eq!(secret.field("type"), Some(&json!("Opaque")));
        assert_eq!(secret.object().types.as_ref().unwrap().kind, "Secret");
    }

    #[test]
    fn test_set_value_keeps_other_fields() {
        let object: DynamicObject = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": {
                "name": "app",
                "namespace": "prod",
                "resourceVersion": "42",
                "annotations": {"owner": "team-a"}
            },
            "data": {"k": "old", "other": "x"},
            "binaryData": {"blob": "AAEC"}
        }))
        .unwrap();

        let mut cm = Resource::from_object(ResourceKind::ConfigMap, object);
        cm.set_value("k", "new");

        assert_eq!(cm.value("k"), Some("new"));
        assert_eq!(cm.value("other"), Some("x"));
        assert_eq!(cm.field("binaryData"), Some(&json!({"blob": "AAEC"})));
        assert_eq!(cm.object().metadata.resource_version.as_deref(), Some("42"));
        assert_eq!(cm.annotations().unwrap()["owner"], "team-a");
    }

    #[test]
    fn test_set_value_on_object_without_data() {
        let object: DynamicObject = serde_json::from_value(json!({
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": {"name": "empty", "namespace": "prod"}
        }))
        .unwrap();

        let mut cm = Resource::from_object(ResourceKind::ConfigMap, object);
        assert!(cm.value("k").is_none());
        assert!(cm.data().is_empty());

        cm.set_value("k", "v");
        assert_eq!(cm.data(), BTreeMap::from([("k".to_string(), "v".to_string())]));
    }

    #[test]
    fn test_template_source_from_resource() {
        let cm = Resource::new(ResourceKind::ConfigMap, "prod", "db-url")
            .with_labels(&[("konfd.io/template", "true")])
            .with_annotations(&[
                ("konfd.io/kind", "configmap"),
                ("konfd.io/name", "app"),
                ("konfd.io/key", "url"),
            ])
            .with_value("template", "x");

        assert!(cm.has_label("konfd.io/template", "true"));
        let source = cm.template_source().unwrap();
        assert_eq!(source.namespace, "prod");
        assert_eq!(source.destination.name, "app");
    }

    #[test]
    fn test_stored_value() {
        assert_eq!(stored_value(ResourceKind::ConfigMap, "v"), "v");
        assert_eq!(stored_value(ResourceKind::Secret, "v"), "dg==");
    }
}
