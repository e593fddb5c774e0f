//! Kubernetes API client

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Namespace, Secret};
use kube::api::{Api, ListParams, PostParams};
use kube::core::{ApiResource, DynamicObject, TypeMeta};
use kube::{Client, Config};
use konfd_core::ResourceKind;
use konfd_core::source::template_selector;
use std::time::Duration;

use super::ResourceClient;
use crate::error::{KubeError, Result};
use crate::resource::Resource;

/// [`ResourceClient`] backed by the Kubernetes API server
#[derive(Clone)]
pub struct ClusterClient {
    client: Client,
}

impl ClusterClient {
    /// Connect using the inferred kubeconfig or in-cluster configuration
    ///
    /// `request_timeout` bounds connecting and reading each response.
    pub async fn connect(request_timeout: Duration) -> Result<Self> {
        let mut config = Config::infer().await?;
        config.connect_timeout = Some(request_timeout);
        config.read_timeout = Some(request_timeout);

        let client = Client::try_from(config)?;
        Ok(Self { client })
    }

    fn api(&self, kind: ResourceKind, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, &api_resource(kind))
    }
}

/// Group, version and plural of a kind
fn api_resource(kind: ResourceKind) -> ApiResource {
    match kind {
        ResourceKind::ConfigMap => ApiResource::erase::<ConfigMap>(&()),
        ResourceKind::Secret => ApiResource::erase::<Secret>(&()),
    }
}

/// The object body to send, with apiVersion and kind filled in
fn request_body(resource: &Resource) -> DynamicObject {
    let mut object = resource.object().clone();
    object.types.get_or_insert_with(|| TypeMeta {
        api_version: "v1".to_string(),
        kind: resource.kind().api_kind().to_string(),
    });
    object
}

fn reconcile_error(action: &'static str, resource: &Resource, err: kube::Error) -> KubeError {
    KubeError::Reconcile {
        action,
        kind: resource.kind(),
        namespace: resource.namespace().to_string(),
        name: resource.name().to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl ResourceClient for ClusterClient {
    async fn get_resource(
        &self,
        kind: ResourceKind,
        namespace: &str,
        name: &str,
    ) -> Result<Resource> {
        match self.api(kind, namespace).get(name).await {
            Ok(object) => Ok(Resource::from_object(kind, object)),
            Err(kube::Error::Api(e)) if e.code == 404 => Err(KubeError::NotFound {
                kind,
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
            Err(e) => Err(KubeError::Fetch {
                target: format!("{} {}/{}", kind, namespace, name),
                message: e.to_string(),
            }),
        }
    }

    async fn list_template_resources(&self, namespace: &str) -> Result<Vec<Resource>> {
        let params = ListParams::default().labels(&template_selector());
        let list = self
            .api(ResourceKind::ConfigMap, namespace)
            .list(&params)
            .await
            .map_err(|e| KubeError::Fetch {
                target: format!("template configmaps in {}", namespace),
                message: e.to_string(),
            })?;

        Ok(list
            .items
            .into_iter()
            .map(|object| Resource::from_object(ResourceKind::ConfigMap, object))
            .collect())
    }

    async fn list_namespaces(&self) -> Result<Vec<String>> {
        let api: Api<Namespace> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| KubeError::Fetch {
                target: "namespaces".to_string(),
                message: e.to_string(),
            })?;

        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }

    async fn create_resource(&self, resource: &Resource) -> Result<()> {
        self.api(resource.kind(), resource.namespace())
            .create(&PostParams::default(), &request_body(resource))
            .await
            .map_err(|e| reconcile_error("creating", resource, e))?;
        Ok(())
    }

    async fn update_resource(&self, resource: &Resource) -> Result<()> {
        self.api(resource.kind(), resource.namespace())
            .replace(resource.name(), &PostParams::default(), &request_body(resource))
            .await
            .map_err(|e| reconcile_error("updating", resource, e))?;
        Ok(())
    }

    async fn server_version(&self) -> Result<String> {
        let info = self.client.apiserver_version().await?;
        Ok(info.git_version)
    }
}
