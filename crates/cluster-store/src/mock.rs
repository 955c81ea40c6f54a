//! Mock ClusterStore for unit testing
//!
//! Keeps objects in memory, records every successful write in order, and can
//! be told to fail or lose a race on the next call for a given kind.
//!
//! Creates yield to the runtime before committing, so passes joined on one
//! task interleave between their get and their create.

use crate::error::StoreError;
use crate::key::{ObjectKey, ResourceKind, DEFAULT_NAMESPACE};
use crate::store_trait::ClusterStore;
use crds::Web;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A successful write observed by the mock, in commit order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreWrite {
    pub kind: ResourceKind,
    pub key: ObjectKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    FailGet(ResourceKind),
    FailCreate(ResourceKind),
    /// Another writer creates the object just before our create lands
    RaceCreate(ResourceKind),
}

/// Mock ClusterStore for testing
#[derive(Clone, Default)]
pub struct MockClusterStore {
    webs: Arc<Mutex<HashMap<ObjectKey, Web>>>,
    config_maps: Arc<Mutex<HashMap<ObjectKey, ConfigMap>>>,
    deployments: Arc<Mutex<HashMap<ObjectKey, Deployment>>>,
    writes: Arc<Mutex<Vec<StoreWrite>>>,
    faults: Arc<Mutex<Vec<Fault>>>,
    next_uid: Arc<Mutex<u64>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn key_of(meta: &ObjectMeta) -> ObjectKey {
    ObjectKey::new(
        meta.name.clone().unwrap_or_default(),
        meta.namespace.clone().unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
    )
}

impl MockClusterStore {
    /// Create an empty mock store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Web to the mock store (for test setup)
    pub fn add_web(&self, web: Web) {
        lock(&self.webs).insert(key_of(&web.metadata), web);
    }

    /// Remove a Web, as if the user deleted it
    pub fn remove_web(&self, key: &ObjectKey) {
        lock(&self.webs).remove(key);
    }

    /// Add a ConfigMap to the mock store without recording a write
    pub fn add_config_map(&self, config_map: ConfigMap) {
        lock(&self.config_maps).insert(key_of(&config_map.metadata), config_map);
    }

    /// Add a Deployment to the mock store without recording a write
    pub fn add_deployment(&self, deployment: Deployment) {
        lock(&self.deployments).insert(key_of(&deployment.metadata), deployment);
    }

    pub fn config_map(&self, key: &ObjectKey) -> Option<ConfigMap> {
        lock(&self.config_maps).get(key).cloned()
    }

    pub fn deployment(&self, key: &ObjectKey) -> Option<Deployment> {
        lock(&self.deployments).get(key).cloned()
    }

    /// Every successful write so far, in commit order
    pub fn writes(&self) -> Vec<StoreWrite> {
        lock(&self.writes).clone()
    }

    /// Make the next get of `kind` fail with a transient error
    pub fn fail_next_get(&self, kind: ResourceKind) {
        lock(&self.faults).push(Fault::FailGet(kind));
    }

    /// Make the next create of `kind` fail with a transient error
    pub fn fail_next_create(&self, kind: ResourceKind) {
        lock(&self.faults).push(Fault::FailCreate(kind));
    }

    /// Let a concurrent writer win the next create of `kind`
    pub fn race_next_create(&self, kind: ResourceKind) {
        lock(&self.faults).push(Fault::RaceCreate(kind));
    }

    fn next_uid(&self) -> String {
        let mut uid = lock(&self.next_uid);
        *uid += 1;
        format!("mock-uid-{}", *uid)
    }

    fn take_fault(&self, wanted: Fault) -> bool {
        let mut faults = lock(&self.faults);
        match faults.iter().position(|f| *f == wanted) {
            Some(index) => {
                faults.remove(index);
                true
            }
            None => false,
        }
    }

    fn check_get(&self, kind: ResourceKind, key: &ObjectKey) -> Result<(), StoreError> {
        if self.take_fault(Fault::FailGet(kind)) {
            return Err(StoreError::Injected(format!("get {} {} unavailable", kind, key)));
        }
        Ok(())
    }

    fn insert<K: Clone>(
        &self,
        kind: ResourceKind,
        objects: &Mutex<HashMap<ObjectKey, K>>,
        object: &K,
        meta: impl Fn(&mut K) -> &mut ObjectMeta,
    ) -> Result<K, StoreError> {
        let mut stored = object.clone();
        let key = key_of(meta(&mut stored));

        if self.take_fault(Fault::FailCreate(kind)) {
            return Err(StoreError::Injected(format!("create {} {} unavailable", kind, key)));
        }

        let raced = self.take_fault(Fault::RaceCreate(kind));
        let mut objects = lock(objects);
        if objects.contains_key(&key) || raced {
            if raced {
                let mut winner = object.clone();
                meta(&mut winner).uid = Some(self.next_uid());
                objects.insert(key.clone(), winner);
                lock(&self.writes).push(StoreWrite { kind, key: key.clone() });
            }
            return Err(StoreError::AlreadyExists { kind, name: key.name });
        }

        let stored_meta = meta(&mut stored);
        stored_meta.uid = Some(self.next_uid());
        stored_meta.resource_version = Some("1".to_string());
        objects.insert(key.clone(), stored.clone());
        lock(&self.writes).push(StoreWrite { kind, key });
        Ok(stored)
    }
}

#[async_trait::async_trait]
impl ClusterStore for MockClusterStore {
    async fn get_web(&self, key: &ObjectKey) -> Result<Option<Web>, StoreError> {
        self.check_get(ResourceKind::Web, key)?;
        Ok(lock(&self.webs).get(key).cloned())
    }

    async fn get_config_map(&self, key: &ObjectKey) -> Result<Option<ConfigMap>, StoreError> {
        self.check_get(ResourceKind::ConfigMap, key)?;
        Ok(self.config_map(key))
    }

    async fn create_config_map(&self, config_map: &ConfigMap) -> Result<ConfigMap, StoreError> {
        tokio::task::yield_now().await;
        self.insert(ResourceKind::ConfigMap, &self.config_maps, config_map, |cm| &mut cm.metadata)
    }

    async fn get_deployment(&self, key: &ObjectKey) -> Result<Option<Deployment>, StoreError> {
        self.check_get(ResourceKind::Deployment, key)?;
        Ok(self.deployment(key))
    }

    async fn create_deployment(&self, deployment: &Deployment) -> Result<Deployment, StoreError> {
        tokio::task::yield_now().await;
        self.insert(ResourceKind::Deployment, &self.deployments, deployment, |d| &mut d.metadata)
    }
}
