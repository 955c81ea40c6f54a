//! Kubernetes-backed cluster store

use crate::error::StoreError;
use crate::key::{ObjectKey, ResourceKind, DEFAULT_NAMESPACE};
use crate::store_trait::ClusterStore;
use crds::Web;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::NamespaceResourceScope;
use kube::api::{Api, PostParams};
use kube::{Client, Resource};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tracing::debug;

/// Cluster store talking to the Kubernetes API server.
#[derive(Clone)]
pub struct KubeClusterStore {
    client: Client,
}

impl KubeClusterStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn get_opt<K>(&self, kind: ResourceKind, key: &ObjectKey) -> Result<Option<K>, StoreError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        debug!("Fetching {} {}", kind, key);
        Ok(self.api::<K>(&key.namespace).get_opt(&key.name).await?)
    }

    async fn create<K>(&self, kind: ResourceKind, object: &K) -> Result<K, StoreError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Serialize + Debug,
        K::DynamicType: Default,
    {
        let name = object.meta().name.clone().unwrap_or_default();
        let namespace = object.meta().namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE);
        debug!("Creating {} {}/{}", kind, namespace, name);

        match self.api::<K>(namespace).create(&PostParams::default(), object).await {
            Ok(created) => Ok(created),
            Err(kube::Error::Api(ae)) if ae.code == 409 => {
                Err(StoreError::AlreadyExists { kind, name })
            }
            Err(e) => Err(StoreError::Kube(e)),
        }
    }
}

#[async_trait::async_trait]
impl ClusterStore for KubeClusterStore {
    async fn get_web(&self, key: &ObjectKey) -> Result<Option<Web>, StoreError> {
        self.get_opt(ResourceKind::Web, key).await
    }

    async fn get_config_map(&self, key: &ObjectKey) -> Result<Option<ConfigMap>, StoreError> {
        self.get_opt(ResourceKind::ConfigMap, key).await
    }

    async fn create_config_map(&self, config_map: &ConfigMap) -> Result<ConfigMap, StoreError> {
        self.create(ResourceKind::ConfigMap, config_map).await
    }

    async fn get_deployment(&self, key: &ObjectKey) -> Result<Option<Deployment>, StoreError> {
        self.get_opt(ResourceKind::Deployment, key).await
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment, StoreError> {
        self.create(ResourceKind::Deployment, deployment).await
    }
}
