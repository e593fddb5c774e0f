//! Mock resource client for testing
//!
//! This client keeps objects in memory, useful for unit tests
//! without requiring a Kubernetes cluster.

use async_trait::async_trait;
use konfd_core::ResourceKind;
use konfd_core::source::keys;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, RwLock};

use super::ResourceClient;
use crate::error::{KubeError, Result};
use crate::resource::Resource;

/// (kind, namespace, name)
type ObjectKey = (ResourceKind, String, String);

fn key_of(kind: ResourceKind, namespace: &str, name: &str) -> ObjectKey {
    (kind, namespace.to_string(), name.to_string())
}

/// In-memory resource client for testing
#[derive(Clone, Default)]
pub struct MockResourceClient {
    /// Storage: (kind, namespace, name) -> object
    store: Arc<RwLock<BTreeMap<ObjectKey, Resource>>>,
    /// Namespaces that exist without holding any object
    namespaces: Arc<RwLock<BTreeSet<String>>>,
    /// Track operation counts for assertions
    operations: Arc<RwLock<OperationCounts>>,
    /// Every object read, in order
    reads: Arc<RwLock<Vec<ObjectKey>>>,
    failures: Arc<RwLock<Failures>>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub gets: usize,
    pub lists: usize,
    pub namespace_lists: usize,
    pub creates: usize,
    pub updates: usize,
    pub version_checks: usize,
}

#[derive(Default)]
struct Failures {
    gets: HashSet<ObjectKey>,
    lists: bool,
    creates: bool,
    updates: bool,
    unready_checks: usize,
}

impl MockResourceClient {
    /// Create a new empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-populated objects
    pub fn with_resources(resources: impl IntoIterator<Item = Resource>) -> Self {
        let client = Self::new();
        for resource in resources {
            client.insert(resource);
        }
        client
    }

    /// Store an object, replacing any previous one with the same identity
    pub fn insert(&self, resource: Resource) {
        let key = key_of(resource.kind(), resource.namespace(), resource.name());
        self.store.write().unwrap().insert(key, resource);
    }

    /// Register an empty namespace
    pub fn add_namespace(&self, namespace: &str) {
        self.namespaces.write().unwrap().insert(namespace.to_string());
    }

    /// Snapshot of one stored object
    pub fn resource(&self, kind: ResourceKind, namespace: &str, name: &str) -> Option<Resource> {
        self.store
            .read()
            .unwrap()
            .get(&key_of(kind, namespace, name))
            .cloned()
    }

    /// Snapshot of one stored value
    pub fn value(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
        key: &str,
    ) -> Option<String> {
        self.resource(kind, namespace, name)
            .and_then(|r| r.value(key).map(str::to_string))
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations.read().unwrap().clone()
    }

    /// How many times one object was read
    pub fn reads_of(&self, kind: ResourceKind, namespace: &str, name: &str) -> usize {
        let key = key_of(kind, namespace, name);
        self.reads.read().unwrap().iter().filter(|k| **k == key).count()
    }

    /// Make reads of one object fail with a transport error
    pub fn fail_get(&self, kind: ResourceKind, namespace: &str, name: &str) {
        self.failures
            .write()
            .unwrap()
            .gets
            .insert(key_of(kind, namespace, name));
    }

    /// Make template listing fail
    pub fn fail_lists(&self) {
        self.failures.write().unwrap().lists = true;
    }

    /// Make every create fail
    pub fn fail_creates(&self) {
        self.failures.write().unwrap().creates = true;
    }

    /// Make every update fail
    pub fn fail_updates(&self) {
        self.failures.write().unwrap().updates = true;
    }

    /// Answer the next `count` version checks with an error
    pub fn unready_for(&self, count: usize) {
        self.failures.write().unwrap().unready_checks = count;
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        *self.failures.write().unwrap() = Failures::default();
    }

    fn count(&self, op: impl FnOnce(&mut OperationCounts)) {
        op(&mut self.operations.write().unwrap());
    }

    fn reconcile_error(action: &'static str, resource: &Resource, message: &str) -> KubeError {
        KubeError::Reconcile {
            action,
            kind: resource.kind(),
            namespace: resource.namespace().to_string(),
            name: resource.name().to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl ResourceClient for MockResourceClient {
    async fn get_resource(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Resource> {
        self.count(|ops| ops.gets += 1);
        let key = key_of(kind, namespace, name);
        self.reads.write().unwrap().push(key.clone());

        if self.failures.read().unwrap().gets.contains(&key) {
            return Err(KubeError::Fetch {
                target: format!("{} {}/{}", kind, namespace, name),
                message: "injected failure".to_string(),
            });
        }

        self.store
            .read()
            .unwrap()
            .get(&key)
            .cloned()
            .ok_or_else(|| KubeError::NotFound {
                kind,
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    async fn list_template_resources(&self, namespace: &str) -> Result<Vec<Resource>> {
        self.count(|ops| ops.lists += 1);

        if self.failures.read().unwrap().lists {
            return Err(KubeError::Fetch {
                target: format!("template configmaps in {}", namespace),
                message: "injected failure".to_string(),
            });
        }

        let store = self.store.read().unwrap();
        Ok(store
            .values()
            .filter(|r| r.kind() == ResourceKind::ConfigMap && r.namespace() == namespace)
            .filter(|r| r.has_label(keys::TEMPLATE_LABEL, keys::TEMPLATE_LABEL_VALUE))
            .cloned()
            .collect())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        self.count(|ops| ops.namespace_lists += 1);

        let mut namespaces = self.namespaces.read().unwrap().clone();
        namespaces.extend(
            self.store
                .read()
                .unwrap()
                .keys()
                .map(|(_, namespace, _)| namespace.clone()),
        );
        Ok(namespaces.into_iter().collect())
    }

    async fn create_resource(&self, resource: &Resource) -> Result<()> {
        self.count(|ops| ops.creates += 1);

        if self.failures.read().unwrap().creates {
            return Err(Self::reconcile_error("creating", resource, "injected failure"));
        }

        let key = key_of(resource.kind(), resource.namespace(), resource.name());
        let mut store = self.store.write().unwrap();
        if store.contains_key(&key) {
            return Err(Self::reconcile_error("creating", resource, "already exists"));
        }
        store.insert(key, resource.clone());
        Ok(())
    }

    async fn update_resource(&self, resource: &Resource) -> Result<()> {
        self.count(|ops| ops.updates += 1);

        if self.failures.read().unwrap().updates {
            return Err(Self::reconcile_error("updating", resource, "injected failure"));
        }

        let key = key_of(resource.kind(), resource.namespace(), resource.name());
        let mut store = self.store.write().unwrap();
        match store.get_mut(&key) {
            Some(current) => {
                *current = resource.clone();
                Ok(())
            }
            None => Err(Self::reconcile_error("updating", resource, "not found")),
        }
    }

    async fn server_version(&self) -> Result<String> {
        self.count(|ops| ops.version_checks += 1);

        let mut failures = self.failures.write().unwrap();
        if failures.unready_checks > 0 {
            failures.unready_checks -= 1;
            return Err(KubeError::Fetch {
                target: "server version".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok("v1.31.0-mock".to_string())
    }
}
