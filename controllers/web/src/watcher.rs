//! Kubernetes resource watchers.
//!
//! Runs a `kube_runtime::Controller` for Web resources that also watches the
//! ConfigMaps and Deployments they own, so a change to either dependent
//! re-triggers reconciliation of the owning Web. The runtime's work queue
//! serializes passes per Web and runs distinct Webs concurrently.

use crate::backoff::{BackoffTracker, ExponentialBackoff};
use crate::error::ControllerError;
use crate::probes::Readiness;
use crate::reconciler::{ReconcileOutcome, Reconciler};
use cluster_store::{ObjectKey, DEFAULT_NAMESPACE};
use crds::Web;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Resource};
use kube_runtime::controller::{Action, Config as RuntimeConfig};
use kube_runtime::{watcher, Controller};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared state handed to every reconciliation
pub struct Context {
    reconciler: Reconciler,
    backoff: BackoffTracker,
}

/// Identifier the engine re-fetches from; namespace falls back to `default`.
fn object_key<K: Resource>(object: &K) -> Option<ObjectKey> {
    let meta = object.meta();
    let name = meta.name.clone()?;
    let namespace = meta.namespace.clone().unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    Some(ObjectKey::new(name, namespace))
}

fn action_for(outcome: ReconcileOutcome) -> Action {
    match outcome {
        ReconcileOutcome::Done => Action::await_change(),
        ReconcileOutcome::RequeueAfter(delay) => Action::requeue(delay),
    }
}

async fn reconcile(web: Arc<Web>, ctx: Arc<Context>) -> Result<Action, ControllerError> {
    let key = object_key(web.as_ref()).ok_or(ControllerError::MissingName)?;

    let outcome = ctx.reconciler.reconcile(&key).await?;
    ctx.backoff.reset(&key.to_string());
    Ok(action_for(outcome))
}

fn error_policy(web: Arc<Web>, error: &ControllerError, ctx: Arc<Context>) -> Action {
    let key = object_key(web.as_ref())
        .map(|key| key.to_string())
        .unwrap_or_else(|| "<unnamed>".to_string());
    let (delay, error_count) = ctx.backoff.record_failure(&key);
    error!(
        "Reconciliation error for Web {} (attempt {}), requeue in {:?}: {}",
        key, error_count, delay, error
    );
    Action::requeue(delay)
}

/// Watches Web resources and their owned dependents.
pub struct Watcher {
    context: Arc<Context>,
    web_api: Api<Web>,
    config_map_api: Api<ConfigMap>,
    deployment_api: Api<Deployment>,
    concurrency: u16,
    readiness: Arc<Readiness>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(
        reconciler: Reconciler,
        web_api: Api<Web>,
        config_map_api: Api<ConfigMap>,
        deployment_api: Api<Deployment>,
        concurrency: u16,
        backoff: ExponentialBackoff,
        readiness: Arc<Readiness>,
    ) -> Self {
        Self {
            context: Arc::new(Context {
                reconciler,
                backoff: BackoffTracker::new(backoff),
            }),
            web_api,
            config_map_api,
            deployment_api,
            concurrency,
            readiness,
        }
    }

    /// Watches Web resources until shutdown (SIGINT/SIGTERM).
    ///
    /// In-flight passes are dropped on shutdown; every step is idempotent, so
    /// the next start finishes whatever was left half-done.
    pub async fn watch_webs(self) -> Result<(), ControllerError> {
        info!("Starting Web watcher (concurrency {})", self.concurrency);

        let controller = Controller::new(self.web_api, watcher::Config::default())
            .owns(self.config_map_api, watcher::Config::default())
            .owns(self.deployment_api, watcher::Config::default())
            .with_config(RuntimeConfig::default().concurrency(self.concurrency))
            .shutdown_on_signal();

        self.readiness.mark_ready();

        controller
            .run(reconcile, error_policy, self.context)
            .for_each(|res| async move {
                match res {
                    Ok((object, _action)) => debug!("Reconciled {}", object),
                    Err(e) => warn!("Controller error for Web: {}", e),
                }
            })
            .await;

        info!("Web watcher stopped");
        Ok(())
    }
}
