mod defaults;
mod polling;


pub use polling::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::BotError;
use defaults::*;

/// Top-level tgbot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub polling: PollConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), BotError> {
        self.polling.validate()
    }
}

/// Bot API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub token: String,
    /// Bot API server root. Override to use a self-hosted Bot API server.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Timeout for regular (non long-poll) requests.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub malformed: MalformedPolicy,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            log_level: default_log_level(),
            malformed: MalformedPolicy::default(),
        }
    }
}

/// What to do with a `getUpdates` entry whose payload fails to decode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Drop the entry and keep the rest of the batch (default).
    #[default]
    Skip,
    /// Fail the whole fetch; the batch is requested again next cycle.
    FailBatch,
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, BotError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| BotError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| BotError::Config(format!("failed to parse config: {}", e)))?;

    config.validate()?;
    Ok(config)
}
