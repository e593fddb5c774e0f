//! Access to ConfigMaps, Secrets and Namespaces
//!
//! konfd talks to the cluster only through [`ResourceClient`]:
//! - [`ClusterClient`]: the Kubernetes API via `kube`
//! - [`MockResourceClient`]: an in-memory store for tests

mod cluster;
mod mock;

pub use cluster::ClusterClient;
pub use mock::{MockResourceClient, OperationCounts};

use async_trait::async_trait;
use konfd_core::ResourceKind;

use crate::error::Result;
use crate::resource::Resource;

/// Cluster operations konfd needs
///
/// Implementations must be Send + Sync for use across async tasks.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    /// Read one object
    ///
    /// Absence is reported as [`KubeError::NotFound`](crate::KubeError::NotFound),
    /// any other failure as [`KubeError::Fetch`](crate::KubeError::Fetch).
    async fn get_resource(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Resource>;

    /// List the template ConfigMaps of a namespace, by label
    async fn list_template_resources(&self, namespace: &str) -> Result<Vec<Resource>>;

    /// List every namespace name
    async fn list_namespaces(&self) -> Result<Vec<String>>;

    /// Create an object that does not exist yet
    async fn create_resource(&self, resource: &Resource) -> Result<()>;

    /// Replace an existing object with the full body of `resource`
    async fn update_resource(&self, resource: &Resource) -> Result<()>;

    /// Version of the API server, used as a readiness check
    async fn server_version(&self) -> Result<String>;
}
