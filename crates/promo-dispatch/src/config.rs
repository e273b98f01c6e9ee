//! Configuration for the dispatcher.

use serde::{Deserialize, Serialize};
use std::fs;

/// Complete dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub platform: PlatformConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Platform bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Base URL of the platform API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bot token for direct calls. Ignored when `relay` is set.
    #[serde(default)]
    pub bot_token: String,
    /// When present, all calls go through the credential relay instead of
    /// carrying the bot token directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay: Option<RelayClientConfig>,
}

/// Settings for calling through the credential relay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayClientConfig {
    /// Relay base URL, e.g. `http://relay:8080`.
    pub url: String,
    /// Static bearer token authorizing this client against the relay.
    pub auth_token: String,
    /// Credential alias the relay resolves to the real bot token.
    pub credential: String,
}

/// Deferred-send settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Path of the JSON blob holding the scheduled-send list.
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// `PROMO_RELAY_URL` switches the gateway into relay mode; otherwise
    /// `PROMO_BOT_TOKEN` is used for direct calls.
    pub fn from_env() -> Self {
        let relay = std::env::var("PROMO_RELAY_URL").ok().map(|url| RelayClientConfig {
            url,
            auth_token: std::env::var("PROMO_RELAY_AUTH_TOKEN").unwrap_or_default(),
            credential: std::env::var("PROMO_RELAY_CREDENTIAL").unwrap_or_default(),
        });

        Config {
            platform: PlatformConfig {
                api_base: std::env::var("PROMO_API_BASE").unwrap_or_else(|_| default_api_base()),
                bot_token: std::env::var("PROMO_BOT_TOKEN").unwrap_or_default(),
                relay,
            },
            schedule: ScheduleConfig {
                store_path: std::env::var("PROMO_SCHEDULE_STORE")
                    .unwrap_or_else(|_| default_store_path()),
            },
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_store_path() -> String {
    "data/scheduled_sends.json".to_string()
}

/// Errors from loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    Read { path: String, source: std::io::Error },
    Parse { path: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "Failed to read config file {path}: {source}"),
            Self::Parse { path, message } => {
                write!(f, "Failed to parse config file {path}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}
