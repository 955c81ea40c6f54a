//! Controller configuration loaded from environment variables.

use crate::error::ControllerError;
use crate::naming::NamingScheme;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_METRICS_PORT: u16 = 8080;
const DEFAULT_CONCURRENCY: u16 = 3;
const DEFAULT_BACKOFF_BASE_SECONDS: u64 = 1;
const DEFAULT_BACKOFF_MAX_SECONDS: u64 = 300;

/// Runtime settings for the Web Controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Namespace to watch; `None` watches all namespaces
    pub namespace: Option<String>,
    /// Address serving `/healthz`, `/readyz` and `/metrics`
    pub metrics_bind_address: SocketAddr,
    /// Maximum concurrent reconciliations (distinct Webs)
    pub concurrency: u16,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    /// How dependent object names are derived from the Web name
    pub naming: NamingScheme,
}

impl ControllerConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the value of a variable if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.trim().is_empty());

        let metrics_bind_address = parse_or(
            &lookup,
            "METRICS_BIND_ADDRESS",
            SocketAddr::from(([0, 0, 0, 0], DEFAULT_METRICS_PORT)),
        )?;

        let concurrency: u16 = parse_or(&lookup, "RECONCILE_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        if concurrency == 0 {
            return Err(ControllerError::InvalidConfig(
                "RECONCILE_CONCURRENCY must be at least 1".to_string(),
            ));
        }

        let base_seconds: u64 =
            parse_or(&lookup, "BACKOFF_BASE_SECONDS", DEFAULT_BACKOFF_BASE_SECONDS)?;
        let max_seconds: u64 =
            parse_or(&lookup, "BACKOFF_MAX_SECONDS", DEFAULT_BACKOFF_MAX_SECONDS)?;
        if base_seconds == 0 || max_seconds < base_seconds {
            return Err(ControllerError::InvalidConfig(format!(
                "backoff bounds must satisfy 0 < BACKOFF_BASE_SECONDS ({}) \
                 <= BACKOFF_MAX_SECONDS ({})",
                base_seconds, max_seconds
            )));
        }

        let naming = parse_or(&lookup, "WEB_NAMING", NamingScheme::default())?;

        Ok(Self {
            namespace,
            metrics_bind_address,
            concurrency,
            backoff_base: Duration::from_secs(base_seconds),
            backoff_max: Duration::from_secs(max_seconds),
            naming,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ControllerError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ControllerError::InvalidConfig(format!("{}={:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ControllerConfig, ControllerError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ControllerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.namespace, None);
        assert_eq!(config.metrics_bind_address.to_string(), "0.0.0.0:8080");
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.backoff_base, Duration::from_secs(1));
        assert_eq!(config.backoff_max, Duration::from_secs(300));
        assert_eq!(config.naming, NamingScheme::Legacy);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("WATCH_NAMESPACE", "web-system"),
            ("METRICS_BIND_ADDRESS", "127.0.0.1:9090"),
            ("RECONCILE_CONCURRENCY", "8"),
            ("BACKOFF_BASE_SECONDS", "2"),
            ("BACKOFF_MAX_SECONDS", "60"),
            ("WEB_NAMING", "delimited"),
        ])
        .unwrap();
        assert_eq!(config.namespace.as_deref(), Some("web-system"));
        assert_eq!(config.metrics_bind_address.port(), 9090);
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.backoff_base, Duration::from_secs(2));
        assert_eq!(config.backoff_max, Duration::from_secs(60));
        assert_eq!(config.naming, NamingScheme::Delimited);
    }

    #[test]
    fn test_blank_namespace_means_all_namespaces() {
        let config = load(&[("WATCH_NAMESPACE", "  ")]).unwrap();
        assert_eq!(config.namespace, None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            load(&[("RECONCILE_CONCURRENCY", "many")]),
            Err(ControllerError::InvalidConfig(_))
        ));
        assert!(load(&[("RECONCILE_CONCURRENCY", "0")]).is_err());
        assert!(load(&[("METRICS_BIND_ADDRESS", "not-an-address")]).is_err());
        assert!(load(&[("WEB_NAMING", "fancy")]).is_err());
    }

    #[test]
    fn test_backoff_bounds_must_be_ordered() {
        assert!(load(&[("BACKOFF_BASE_SECONDS", "0")]).is_err());
        assert!(load(&[("BACKOFF_BASE_SECONDS", "30"), ("BACKOFF_MAX_SECONDS", "10")]).is_err());
    }
}
