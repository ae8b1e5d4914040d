//! Telegram Bot API client.
//!
//! Every method is an HTTP POST form to `{api_url}/bot{token}/{method}`.
//! Docs: <https://core.telegram.org/bots/api>

mod configs;
mod fetch;
mod methods;
mod request;

#[cfg(test)]
mod tests;

pub use configs::*;

use std::time::Duration;
use tgbot_core::config::{BotConfig, MalformedPolicy};

/// Handle to one bot account. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct Bot {
    client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
    malformed: MalformedPolicy,
}

impl Bot {
    /// Client for `token` against the public Bot API server.
    pub fn new(token: &str) -> Self {
        Self::from_config(&BotConfig {
            token: token.to_string(),
            ..BotConfig::default()
        })
    }

    pub fn from_config(config: &BotConfig) -> Self {
        let base_url = format!(
            "{}/bot{}",
            config.api_url.trim_end_matches('/'),
            config.token
        );
        Self {
            client: reqwest::Client::new(),
            base_url,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            malformed: config.malformed,
        }
    }

    /// Replace the method root (`{api_url}/bot{token}`) entirely.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.malformed = policy;
        self
    }

    pub fn malformed_policy(&self) -> MalformedPolicy {
        self.malformed
    }
}
