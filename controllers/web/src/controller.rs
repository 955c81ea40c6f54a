//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the Kubernetes
//! client, the reconciler, the Web watcher and the probe server together.

use crate::backoff::ExponentialBackoff;
use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::metrics::Metrics;
use crate::probes::{self, ProbeState, Readiness};
use crate::reconciler::Reconciler;
use crate::watcher::Watcher;
use cluster_store::KubeClusterStore;
use crds::Web;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::ConfigMap;
use kube::{Api, Client};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for Web resources.
pub struct Controller {
    web_watcher: JoinHandle<Result<(), ControllerError>>,
    probe_server: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance and starts its background tasks.
    pub async fn new(config: ControllerConfig) -> Result<Self, ControllerError> {
        info!("Initializing Web Controller");

        let kube_client = Client::try_default().await?;
        let metrics = Metrics::new()?;
        let readiness = Arc::new(Readiness::default());

        let reconciler = Reconciler::new(
            KubeClusterStore::new(kube_client.clone()),
            config.naming.strategy(),
            metrics.clone(),
        );

        let (web_api, config_map_api, deployment_api): (Api<Web>, Api<ConfigMap>, Api<Deployment>) =
            match config.namespace.as_deref() {
                Some(ns) => (
                    Api::namespaced(kube_client.clone(), ns),
                    Api::namespaced(kube_client.clone(), ns),
                    Api::namespaced(kube_client, ns),
                ),
                None => (
                    Api::all(kube_client.clone()),
                    Api::all(kube_client.clone()),
                    Api::all(kube_client),
                ),
            };

        let watcher = Watcher::new(
            reconciler,
            web_api,
            config_map_api,
            deployment_api,
            config.concurrency,
            ExponentialBackoff::new(config.backoff_base, config.backoff_max),
            Arc::clone(&readiness),
        );
        let web_watcher = tokio::spawn(watcher.watch_webs());

        let probe_server = {
            let state = ProbeState::new(readiness, metrics);
            let addr = config.metrics_bind_address;
            tokio::spawn(async move { probes::serve(addr, state).await })
        };

        Ok(Self {
            web_watcher,
            probe_server,
        })
    }

    /// Runs the controller until shutdown.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Web Controller running");

        // The watcher ends on SIGINT/SIGTERM; the probe server only on failure
        tokio::select! {
            result = &mut self.web_watcher => {
                result.map_err(|e| {
                    ControllerError::Watch(format!("Web watcher panicked: {}", e))
                })??;
            }
            result = &mut self.probe_server => {
                result.map_err(|e| {
                    ControllerError::Watch(format!("Probe server panicked: {}", e))
                })??;
            }
        }

        self.probe_server.abort();
        info!("Web Controller stopped");
        Ok(())
    }
}
