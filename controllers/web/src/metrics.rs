//! Prometheus metrics for the Web Controller.

use crate::error::ControllerError;
use cluster_store::ResourceKind;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Counters exported on `/metrics`
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    reconciliations: IntCounterVec,
    dependents_created: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, ControllerError> {
        let registry = Registry::new();

        let reconciliations = IntCounterVec::new(
            Opts::new("web_reconcile_total", "Reconciliation passes by result"),
            &["result"],
        )?;
        let dependents_created = IntCounterVec::new(
            Opts::new("web_dependents_created_total", "Dependent objects created by kind"),
            &["kind"],
        )?;

        registry.register(Box::new(reconciliations.clone()))?;
        registry.register(Box::new(dependents_created.clone()))?;

        Ok(Self {
            registry,
            reconciliations,
            dependents_created,
        })
    }

    pub fn reconcile_done(&self) {
        self.reconciliations.with_label_values(&["done"]).inc();
    }

    pub fn reconcile_error(&self) {
        self.reconciliations.with_label_values(&["error"]).inc();
    }

    pub fn dependent_created(&self, kind: ResourceKind) {
        self.dependents_created.with_label_values(&[kind.as_str()]).inc();
    }

    /// Current values in the Prometheus text exposition format
    pub fn render(&self) -> Result<String, ControllerError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| {
            ControllerError::Metrics(prometheus::Error::Msg(format!(
                "metrics output is not UTF-8: {}",
                e
            )))
        })
    }

    #[cfg(test)]
    pub fn created_count(&self, kind: ResourceKind) -> u64 {
        self.dependents_created.with_label_values(&[kind.as_str()]).get()
    }

    #[cfg(test)]
    pub fn reconcile_count(&self, result: &str) -> u64 {
        self.reconciliations.with_label_values(&[result]).get()
    }
}
