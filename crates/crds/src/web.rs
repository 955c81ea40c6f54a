//! Web CRD
//!
//! Declares a static web application: an image to run and the HTML document it
//! serves. The controller materialises each `Web` as a ConfigMap holding the
//! content and a Deployment mounting it.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "epam.com",
    version = "v1alpha1",
    kind = "Web",
    namespaced,
    status = "WebStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct WebSpec {
    /// Desired replica count.
    ///
    /// Stored as declared; the controller does not yet apply it to the Deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 5))]
    pub size: Option<i32>,

    /// Port the web container listens on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_port: Option<i32>,

    /// Container image serving the content (e.g. `nginx:1.25`)
    #[serde(default)]
    pub image: String,

    /// Inline HTML document served as `index.html`
    #[serde(default)]
    pub html_content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebStatus {
    /// Observed conditions, keyed by `type`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<WebCondition>,
}

/// A single observation of one aspect of the Web's state.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebCondition {
    /// Condition type in CamelCase (e.g. `Available`)
    #[serde(rename = "type")]
    pub type_: String,

    pub status: ConditionStatus,

    /// Programmatic identifier for the last transition
    #[serde(default)]
    pub reason: String,

    /// Human readable details about the last transition
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<chrono::DateTime<chrono::Utc>>,

    /// `.metadata.generation` the condition was computed against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}
