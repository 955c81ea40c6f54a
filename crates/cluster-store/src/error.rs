//! Cluster store errors

use crate::key::ResourceKind;
use thiserror::Error;

/// Errors that can occur when reading or writing cluster objects
#[derive(Debug, Error)]
pub enum StoreError {
    /// Kubernetes API error (transport, authorization, server-side failure)
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Create raced with another writer and lost
    #[error("{kind} {name} already exists")]
    AlreadyExists {
        /// Kind of the conflicting object
        kind: ResourceKind,
        /// Name of the conflicting object
        name: String,
    },

    /// Owner reference could not be attached
    #[error("Ownership error: {0}")]
    Ownership(String),

    /// Failure injected by the mock store
    #[error("Injected failure: {0}")]
    Injected(String),
}

impl StoreError {
    /// True when a create lost a race against a concurrent creator.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}
