//! Web Controller
//!
//! Reconciles `Web` resources (group `epam.com`) into two owned objects:
//! - a ConfigMap `<name>-cm` holding the inline HTML as `index.html`
//! - a Deployment running the requested image with that ConfigMap mounted at `/app`
//!
//! Deleting a Web deletes both through owner-reference garbage collection.

mod backoff;
mod config;
mod controller;
mod error;
mod metrics;
mod naming;
mod probes;
mod reconciler;
mod resolver;
#[cfg(test)]
mod test_utils;
mod watcher;

use crate::config::ControllerConfig;
use crate::error::ControllerError;
use controller::Controller;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // kube uses rustls; pick the ring provider before any client is built
    if rustls::crypto::ring::default_provider().install_default().is_err() {
        warn!("rustls crypto provider was already installed");
    }

    info!("Starting Web Controller");

    let config = ControllerConfig::from_env()?;

    info!("Configuration:");
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Metrics/probes address: {}", config.metrics_bind_address);
    info!("  Concurrency: {}", config.concurrency);
    info!("  Backoff: {:?} .. {:?}", config.backoff_base, config.backoff_max);
    info!("  Naming: {}", config.naming);

    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}
