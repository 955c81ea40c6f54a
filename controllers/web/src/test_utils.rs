//! Test utilities for unit testing reconcilers
//!
//! This module provides helpers for creating test data and setting up test scenarios.

#[cfg(test)]
use crds::{Web, WebSpec};
#[cfg(test)]
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Helper to create a persisted test Web (name, namespace and uid set)
#[cfg(test)]
pub fn create_test_web(
    name: &str,
    namespace: &str,
    size: Option<i32>,
    container_port: Option<i32>,
    image: &str,
    html_content: &str,
) -> Web {
    Web {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(format!("{}-uid", name)),
            ..Default::default()
        },
        spec: WebSpec {
            size,
            container_port,
            image: image.to_string(),
            html_content: html_content.to_string(),
        },
        status: None,
    }
}
