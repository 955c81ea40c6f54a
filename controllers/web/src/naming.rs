//! Names of the objects derived from a Web.
//!
//! Dependent names are a pure function of the Web name so every pass derives
//! the same identities. The legacy scheme appends `deployment` with no
//! delimiter, so `xdeployment` reads the same whether it is the Deployment of
//! Web `x` or an unrelated object named after a Web `xdeployment`.
//! [`DelimitedNaming`] keeps the suffix visually separate.

use std::fmt;
use std::str::FromStr;

/// Maps a Web name to the names of its dependents.
pub trait NamingStrategy: Send + Sync {
    /// Name of the content ConfigMap for Web `web_name`
    fn config_map_name(&self, web_name: &str) -> String;
    /// Name of the serving Deployment for Web `web_name`
    fn deployment_name(&self, web_name: &str) -> String;
}

/// `<name>-cm` and `<name>deployment`
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyNaming;

impl NamingStrategy for LegacyNaming {
    fn config_map_name(&self, web_name: &str) -> String {
        format!("{}-cm", web_name)
    }

    fn deployment_name(&self, web_name: &str) -> String {
        format!("{}deployment", web_name)
    }
}

/// `<name>-cm` and `<name>-deployment`
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedNaming;

impl NamingStrategy for DelimitedNaming {
    fn config_map_name(&self, web_name: &str) -> String {
        format!("{}-cm", web_name)
    }

    fn deployment_name(&self, web_name: &str) -> String {
        format!("{}-deployment", web_name)
    }
}

/// Configurable selector for the naming strategy (`WEB_NAMING`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingScheme {
    #[default]
    Legacy,
    Delimited,
}

impl NamingScheme {
    pub fn strategy(self) -> Box<dyn NamingStrategy> {
        match self {
            NamingScheme::Legacy => Box::new(LegacyNaming),
            NamingScheme::Delimited => Box::new(DelimitedNaming),
        }
    }
}

impl FromStr for NamingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(NamingScheme::Legacy),
            "delimited" => Ok(NamingScheme::Delimited),
            other => Err(format!(
                "unknown naming scheme {:?} (expected legacy or delimited)",
                other
            )),
        }
    }
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingScheme::Legacy => f.write_str("legacy"),
            NamingScheme::Delimited => f.write_str("delimited"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_names() {
        assert_eq!(LegacyNaming.config_map_name("site"), "site-cm");
        assert_eq!(LegacyNaming.deployment_name("site"), "sitedeployment");
    }

    #[test]
    fn test_delimited_names() {
        assert_eq!(DelimitedNaming.config_map_name("site"), "site-cm");
        assert_eq!(DelimitedNaming.deployment_name("site"), "site-deployment");
    }

    #[test]
    fn test_legacy_names_stay_distinct_for_lookalike_webs() {
        for strategy in [NamingScheme::Legacy.strategy(), NamingScheme::Delimited.strategy()] {
            assert_ne!(strategy.deployment_name("x"), strategy.deployment_name("xdeployment"));
            assert_ne!(strategy.config_map_name("x"), strategy.config_map_name("xdeployment"));
        }
        // Only the legacy scheme yields a Deployment name that is itself a plausible Web name
        assert_eq!(LegacyNaming.deployment_name("x"), "xdeployment");
        assert_eq!(DelimitedNaming.deployment_name("x"), "x-deployment");
    }

    #[test]
    fn test_naming_is_deterministic() {
        let strategy = NamingScheme::Legacy.strategy();
        assert_eq!(strategy.deployment_name("a"), strategy.deployment_name("a"));
    }

    #[test]
    fn test_scheme_parsing() {
        assert_eq!("legacy".parse::<NamingScheme>(), Ok(NamingScheme::Legacy));
        assert_eq!("Delimited".parse::<NamingScheme>(), Ok(NamingScheme::Delimited));
        assert!("other".parse::<NamingScheme>().is_err());
        assert_eq!(NamingScheme::Delimited.to_string(), "delimited");
    }
}
