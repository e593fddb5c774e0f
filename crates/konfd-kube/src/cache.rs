//! Per-pass fetch cache
//!
//! A [`FetchCache`] lives for one namespace and one sync pass. Each
//! referenced ConfigMap or Secret is fetched at most once; later lookups see
//! the stored copy even if the object changed in the meantime. Only
//! successful fetches are cached.

use konfd_core::{encoding, ResourceKind};
use konfd_engine::{LookupError, TemplateFunctions};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::client::ResourceClient;
use crate::error::Result;
use crate::resource::Resource;

type Entries = HashMap<(ResourceKind, String), Arc<Resource>>;

/// Objects fetched so far in one namespace during one pass
pub struct FetchCache<'a> {
    client: &'a dyn ResourceClient,
    namespace: String,
    /// Shared with outstanding [`CachedLookups`]; copied only when a fetch
    /// lands while a snapshot is still held
    entries: Arc<Entries>,
}

impl<'a> FetchCache<'a> {
    /// An empty cache for `namespace`
    pub fn new(client: &'a dyn ResourceClient, namespace: &str) -> Self {
        Self {
            client,
            namespace: namespace.to_string(),
            entries: Arc::new(HashMap::new()),
        }
    }

    /// Return the cached object, fetching it on first use
    pub async fn resolve(&mut self, kind: ResourceKind, name: &str) -> Result<Arc<Resource>> {
        if let Some(resource) = self.get(kind, name) {
            return Ok(resource);
        }

        let resource = Arc::new(
            self.client
                .get_resource(kind, &self.namespace, name)
                .await?,
        );
        debug!(namespace = %self.namespace, %kind, name, "fetched referenced object");

        Arc::make_mut(&mut self.entries).insert((kind, name.to_string()), Arc::clone(&resource));
        Ok(resource)
    }

    /// The cached object, without fetching
    pub fn get(&self, kind: ResourceKind, name: &str) -> Option<Arc<Resource>> {
        self.entries.get(&(kind, name.to_string())).cloned()
    }

    pub fn contains(&self, kind: ResourceKind, name: &str) -> bool {
        self.entries.contains_key(&(kind, name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Template lookups answered from the current contents
    pub fn lookups(&self) -> Arc<CachedLookups> {
        Arc::new(CachedLookups {
            entries: Arc::clone(&self.entries),
        })
    }
}

/// Snapshot of a [`FetchCache`] answering `configmap()` and `secret()`
///
/// A miss is reported as [`LookupError::Unresolved`] so the caller can fetch
/// the object and render again.
pub struct CachedLookups {
    entries: Arc<Entries>,
}

impl CachedLookups {
    fn stored(
        &self,
        kind: ResourceKind,
        name: &str,
        key: &str,
    ) -> std::result::Result<String, LookupError> {
        let resource = self
            .entries
            .get(&(kind, name.to_string()))
            .ok_or_else(|| LookupError::Unresolved {
                kind,
                name: name.to_string(),
            })?;

        resource
            .value(key)
            .map(str::to_string)
            .ok_or_else(|| LookupError::MissingKey {
                kind,
                name: name.to_string(),
                key: key.to_string(),
            })
    }
}

impl TemplateFunctions for CachedLookups {
    fn configmap(&self, name: &str, key: &str) -> std::result::Result<String, LookupError> {
        self.stored(ResourceKind::ConfigMap, name, key)
    }

    fn secret(&self, name: &str, key: &str) -> std::result::Result<String, LookupError> {
        let encoded = self.stored(ResourceKind::Secret, name, key)?;
        encoding::decode(&encoded).map_err(|source| LookupError::Decode {
            name: name.to_string(),
            key: key.to_string(),
            source,
        })
    }
}
