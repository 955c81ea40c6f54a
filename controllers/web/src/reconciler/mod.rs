//! Reconciliation logic for the Web CRD.
//!
//! One pass re-fetches the Web, then makes sure its ConfigMap and Deployment
//! exist, in that order: the Deployment's volume points at the ConfigMap.
//! Missing dependents are created with a controller owner reference to the
//! Web; existing ones are left untouched (drift between spec and created
//! dependents is not corrected). Any failure other than absence ends the pass
//! and is returned to the scheduler, which owns retries.


use crate::error::ControllerError;
use crate::metrics::Metrics;
use crate::naming::NamingStrategy;
use crate::resolver;
use cluster_store::{set_controller_reference, ClusterStore, ObjectKey, ResourceKind};
use crds::Web;
use std::time::Duration;
use tracing::{debug, error, info};

/// Result of a successful reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Nothing left to do until the next change
    Done,
    /// Check again after the given delay
    #[allow(dead_code)] // Reserved for time-based re-checks
    RequeueAfter(Duration),
}

/// What happened to one dependent during a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentOutcome {
    /// This pass created it
    Created,
    /// It existed before the pass and was left untouched
    AlreadyPresent,
    /// Another writer created it between our get and our create
    CreatedConcurrently,
}

fn dependent_key(
    web: &Web,
    derive: impl FnOnce(&str) -> String,
) -> Result<ObjectKey, ControllerError> {
    let (name, namespace) = resolver::identity(web)?;
    Ok(ObjectKey::new(derive(name), namespace))
}

/// Reconciles Web resources.
pub struct Reconciler {
    store: Box<dyn ClusterStore>,
    naming: Box<dyn NamingStrategy>,
    metrics: Metrics,
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(
        store: impl ClusterStore + 'static,
        naming: Box<dyn NamingStrategy>,
        metrics: Metrics,
    ) -> Self {
        Self {
            store: Box::new(store),
            naming,
            metrics,
        }
    }

    /// Runs one reconciliation pass for the Web identified by `key`.
    pub async fn reconcile(&self, key: &ObjectKey) -> Result<ReconcileOutcome, ControllerError> {
        let result = self.reconcile_web(key).await;
        match &result {
            Ok(_) => self.metrics.reconcile_done(),
            Err(_) => self.metrics.reconcile_error(),
        }
        result
    }

    async fn reconcile_web(&self, key: &ObjectKey) -> Result<ReconcileOutcome, ControllerError> {
        let web = match self.store.get_web(key).await {
            Ok(Some(web)) => web,
            Ok(None) => {
                info!("Web {} not found, ignoring since object must be deleted", key);
                return Ok(ReconcileOutcome::Done);
            }
            Err(e) => {
                error!("Unable to fetch Web {}: {}", key, e);
                return Err(e.into());
            }
        };

        info!("Reconciling Web {}", key);

        let config_map = self.ensure_config_map(&web).await?;
        let deployment = self.ensure_deployment(&web).await?;

        debug!(
            "Web {} reconciled (ConfigMap: {:?}, Deployment: {:?})",
            key, config_map, deployment
        );
        Ok(ReconcileOutcome::Done)
    }

    /// Makes sure the content ConfigMap exists.
    pub(crate) async fn ensure_config_map(
        &self,
        web: &Web,
    ) -> Result<DependentOutcome, ControllerError> {
        let key = dependent_key(web, |name| self.naming.config_map_name(name))?;

        match self.store.get_config_map(&key).await {
            Ok(Some(_)) => {
                debug!("ConfigMap {} already exists, leaving it untouched", key);
                Ok(DependentOutcome::AlreadyPresent)
            }
            Ok(None) => {
                let mut config_map = resolver::desired_config_map(web, self.naming.as_ref())?;
                set_controller_reference(web, &mut config_map.metadata).map_err(|e| {
                    error!("Unable to set owner reference on ConfigMap {}: {}", key, e);
                    e
                })?;

                match self.store.create_config_map(&config_map).await {
                    Ok(_) => {
                        info!("ConfigMap {} has been created", key);
                        self.metrics.dependent_created(ResourceKind::ConfigMap);
                        Ok(DependentOutcome::Created)
                    }
                    Err(e) if e.is_already_exists() => {
                        info!("ConfigMap {} was created concurrently, treating as success", key);
                        Ok(DependentOutcome::CreatedConcurrently)
                    }
                    Err(e) => {
                        error!("Unable to create ConfigMap {}: {}", key, e);
                        Err(e.into())
                    }
                }
            }
            Err(e) => {
                error!("Unable to get ConfigMap {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    /// Makes sure the serving Deployment exists.
    pub(crate) async fn ensure_deployment(
        &self,
        web: &Web,
    ) -> Result<DependentOutcome, ControllerError> {
        let key = dependent_key(web, |name| self.naming.deployment_name(name))?;

        match self.store.get_deployment(&key).await {
            Ok(Some(_)) => {
                debug!("Deployment {} already exists, leaving it untouched", key);
                Ok(DependentOutcome::AlreadyPresent)
            }
            Ok(None) => {
                let mut deployment = resolver::desired_deployment(web, self.naming.as_ref())?;
                set_controller_reference(web, &mut deployment.metadata).map_err(|e| {
                    error!("Unable to set owner reference on Deployment {}: {}", key, e);
                    e
                })?;

                match self.store.create_deployment(&deployment).await {
                    Ok(_) => {
                        info!("Deployment {} has been created", key);
                        self.metrics.dependent_created(ResourceKind::Deployment);
                        Ok(DependentOutcome::Created)
                    }
                    Err(e) if e.is_already_exists() => {
                        info!("Deployment {} was created concurrently, treating as success", key);
                        Ok(DependentOutcome::CreatedConcurrently)
                    }
                    Err(e) => {
                        error!("Unable to create Deployment {}: {}", key, e);
                        Err(e.into())
                    }
                }
            }
            Err(e) => {
                error!("Unable to get Deployment {}: {}", key, e);
                Err(e.into())
            }
        }
    }
}
