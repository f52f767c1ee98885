pub mod annotations;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use k8s_openapi::api::core::v1::PersistentVolume;
use k8s_openapi::api::core::v1::PersistentVolumeClaim;
use k8s_openapi::api::core::v1::Service;
use kube::Api;
use kube::Client;
use kube::Config;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

/// Read-only view of the cluster the current kubeconfig context points at.
///
/// Getters yield `Ok(None)` when the object doesn't exist; any other API
/// failure is passed through untouched.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// API server URL of the current connection.
    fn endpoint(&self) -> String;

    /// Namespace configured for the current context.
    fn default_namespace(&self) -> String;

    async fn node(&self, name: &str) -> Result<Option<Node>, kube::Error>;

    async fn service(&self, namespace: &str, name: &str) -> Result<Option<Service>, kube::Error>;

    async fn persistent_volume(&self, name: &str) -> Result<Option<PersistentVolume>, kube::Error>;

    async fn persistent_volume_claim(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<PersistentVolumeClaim>, kube::Error>;
}

pub struct KubeClusterApi {
    client: Client,
    endpoint: String,
    default_namespace: String,
}

impl KubeClusterApi {
    pub fn new(config: Config) -> Result<KubeClusterApi, kube::Error> {
        let endpoint = config.cluster_url.to_string();
        let default_namespace = config.default_namespace.clone();
        let client = Client::try_from(config)?;

        debug!(endpoint = %endpoint, namespace = %default_namespace, "connected to cluster");

        Ok(KubeClusterApi {
            client,
            endpoint,
            default_namespace,
        })
    }
}

#[async_trait]
impl ClusterApi for KubeClusterApi {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn default_namespace(&self) -> String {
        self.default_namespace.clone()
    }

    async fn node(&self, name: &str) -> Result<Option<Node>, kube::Error> {
        let api: Api<Node> = Api::all(self.client.clone());
        api.get_opt(name).await
    }

    async fn service(&self, namespace: &str, name: &str) -> Result<Option<Service>, kube::Error> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name).await
    }

    async fn persistent_volume(&self, name: &str) -> Result<Option<PersistentVolume>, kube::Error> {
        let api: Api<PersistentVolume> = Api::all(self.client.clone());
        api.get_opt(name).await
    }

    async fn persistent_volume_claim(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<PersistentVolumeClaim>, kube::Error> {
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name).await
    }
}
