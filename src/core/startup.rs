use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use crate::backends::orkut::OrkutAuth;
use crate::backends::registry::Registry;
use crate::core::config::Config;

/// Register every backend this service knows about.
/// Backends without credentials are registered but reported as disabled.
pub fn build_registry(config: &Config) -> Result<Registry> {
    let mut registry = Registry::new();

    let orkut = OrkutAuth::new(&config.orkut, &config.oauth)
        .context("Failed to create Orkut backend")?;
    registry.register(Arc::new(orkut));

    for name in registry.names() {
        let enabled = registry.get(name).is_some_and(|backend| backend.enabled());
        if enabled {
            info!(backend = name, "Authentication backend enabled");
        } else {
            warn!(backend = name, "Authentication backend has no credentials, disabled");
        }
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
        [server]
        port = 8080

        [logging]
        level = "info"
    "#;

    #[test]
    fn test_orkut_registered_disabled_without_credentials() {
        let config = Config::from_toml(BASE).unwrap();
        let registry = build_registry(&config).unwrap();

        assert_eq!(registry.names(), vec!["orkut"]);
        assert!(registry.enabled_names().is_empty());
    }

    #[test]
    fn test_orkut_enabled_with_credentials() {
        let content = format!(
            "{}\n[orkut]\nconsumer_key = \"example.com\"\nconsumer_secret = \"secret\"\n",
            BASE
        );
        let config = Config::from_toml(&content).unwrap();
        let registry = build_registry(&config).unwrap();

        assert_eq!(registry.enabled_names(), vec!["orkut"]);
    }
}
