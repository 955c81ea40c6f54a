//! Web Operator CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for the Web controller.

pub mod web;

pub use web::*;
