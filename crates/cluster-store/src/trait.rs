//! ClusterStore trait for mocking
//!
//! This trait abstracts the cluster API so the reconciler can be unit tested
//! without a running API server. [`crate::KubeClusterStore`] implements it
//! against a live cluster; tests use [`crate::MockClusterStore`].

use crate::error::StoreError;
use crate::key::ObjectKey;
use crds::Web;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ConfigMap;

/// Trait for cluster state operations used by the Web controller
///
/// Gets return `Ok(None)` when the object does not exist; absence is a normal
/// branch, not an error. Creates are atomic and report a lost race as
/// [`StoreError::AlreadyExists`].
#[async_trait::async_trait]
pub trait ClusterStore: Send + Sync {
    async fn get_web(&self, key: &ObjectKey) -> Result<Option<Web>, StoreError>;

    async fn get_config_map(&self, key: &ObjectKey) -> Result<Option<ConfigMap>, StoreError>;
    async fn create_config_map(&self, config_map: &ConfigMap) -> Result<ConfigMap, StoreError>;

    async fn get_deployment(&self, key: &ObjectKey) -> Result<Option<Deployment>, StoreError>;
    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment, StoreError>;
}
