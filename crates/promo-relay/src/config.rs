//! Relay service configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

/// Complete relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Address to bind the HTTP server to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Static bearer token clients must present.
    #[serde(default)]
    pub auth_token: String,
    /// Base URL of the platform API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Credential alias → real bot token.
    #[serde(default)]
    pub credentials: HashMap<String, String>,
}

impl RelayConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {path}: {e}"))?;
        toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {path}: {e}"))
    }

    /// Load configuration from environment variables. A single credential
    /// alias is supported this way (`RELAY_CREDENTIAL` / `RELAY_BOT_TOKEN`).
    pub fn from_env() -> Self {
        let mut credentials = HashMap::new();
        if let (Ok(alias), Ok(token)) = (
            std::env::var("RELAY_CREDENTIAL"),
            std::env::var("RELAY_BOT_TOKEN"),
        ) {
            credentials.insert(alias, token);
        }

        Self {
            bind_address: std::env::var("RELAY_BIND_ADDRESS")
                .unwrap_or_else(|_| default_bind_address()),
            auth_token: std::env::var("RELAY_AUTH_TOKEN").unwrap_or_default(),
            api_base: std::env::var("RELAY_API_BASE").unwrap_or_else(|_| default_api_base()),
            credentials,
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_with_credential_map() {
        let config: RelayConfig = toml::from_str(
            r#"
            auth_token = "client-s3cret"

            [credentials]
            shop-promotions = "1234:abc"
            shop-alerts = "5678:def"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.api_base, "https://api.telegram.org");
        assert_eq!(
            config.credentials.get("shop-promotions").map(String::as_str),
            Some("1234:abc")
        );
        assert_eq!(config.credentials.len(), 2);
    }

    #[test]
    fn empty_config_still_parses_with_defaults() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert!(config.auth_token.is_empty());
        assert!(config.credentials.is_empty());
    }
}
