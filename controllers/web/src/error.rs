//! Controller-specific error types.
//!
//! This module defines error types specific to the Web Controller
//! that are not covered by upstream library errors.

use cluster_store::StoreError;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the Web Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error outside the cluster store (client bootstrap)
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Cluster store read or write failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid controller configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A Web object without `metadata.name`
    #[error("Web has no metadata.name")]
    MissingName,

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Probe/metrics HTTP server failed
    #[error("HTTP server error: {0}")]
    Server(#[from] std::io::Error),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
