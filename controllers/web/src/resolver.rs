//! Desired state of the objects derived from a Web.
//!
//! Pure functions: the same Web always resolves to the same ConfigMap and
//! Deployment. Ownership is attached by the reconciler, not here.
//!
//! `spec.size` and `spec.containerPort` are intentionally not applied to the
//! Deployment; objects are only resolved at creation time and drift is not
//! corrected.

use crate::error::ControllerError;
use crate::naming::NamingStrategy;
use cluster_store::DEFAULT_NAMESPACE;
use crds::Web;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    ConfigMap, ConfigMapVolumeSource, Container, PodSpec, PodTemplateSpec, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use std::collections::BTreeMap;

/// ConfigMap key holding the Web's HTML document
pub const CONTENT_KEY: &str = "index.html";
/// Pod volume backed by the content ConfigMap
pub const CONTENT_VOLUME: &str = "html";
/// Where the content volume is mounted in the web container
pub const CONTENT_MOUNT_PATH: &str = "/app";
/// Name of the single container in the Deployment's pod template
pub const CONTAINER_NAME: &str = "web-container";
/// Label key used for the Deployment selector
pub const APP_LABEL: &str = "app";

pub(crate) fn identity(web: &Web) -> Result<(&str, &str), ControllerError> {
    let name = web.metadata.name.as_deref().ok_or(ControllerError::MissingName)?;
    let namespace = web.metadata.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE);
    Ok((name, namespace))
}

fn app_labels(web_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), web_name.to_string())])
}

/// The content holder: one `index.html` entry with the Web's HTML.
pub fn desired_config_map(
    web: &Web,
    naming: &dyn NamingStrategy,
) -> Result<ConfigMap, ControllerError> {
    let (name, namespace) = identity(web)?;

    Ok(ConfigMap {
        metadata: ObjectMeta {
            name: Some(naming.config_map_name(name)),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: Some(BTreeMap::from([(
            CONTENT_KEY.to_string(),
            web.spec.html_content.clone(),
        )])),
        ..Default::default()
    })
}

/// The workload: a single web container mounting the content ConfigMap.
///
/// The volume references the ConfigMap by the same derived name
/// [`desired_config_map`] produces.
pub fn desired_deployment(
    web: &Web,
    naming: &dyn NamingStrategy,
) -> Result<Deployment, ControllerError> {
    let (name, namespace) = identity(web)?;

    let container = Container {
        name: CONTAINER_NAME.to_string(),
        image: Some(web.spec.image.clone()),
        volume_mounts: Some(vec![VolumeMount {
            name: CONTENT_VOLUME.to_string(),
            mount_path: CONTENT_MOUNT_PATH.to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    };

    let volume = Volume {
        name: CONTENT_VOLUME.to_string(),
        config_map: Some(ConfigMapVolumeSource {
            name: naming.config_map_name(name),
            ..Default::default()
        }),
        ..Default::default()
    };

    Ok(Deployment {
        metadata: ObjectMeta {
            name: Some(naming.deployment_name(name)),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            selector: LabelSelector {
                match_labels: Some(app_labels(name)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(app_labels(name)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    volumes: Some(vec![volume]),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    })
}
