//! `getUpdates` as a [`Fetcher`].

use super::request::Params;
use super::Bot;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tgbot_core::{
    config::{MalformedPolicy, PollConfig},
    error::BotError,
    traits::Fetcher,
    types::{Batch, Update},
};
use tracing::warn;

/// Extra transport time on top of the long-poll timeout, so a held-open
/// request is never cut short on our side.
const LONG_POLL_GRACE: Duration = Duration::from_secs(10);

#[async_trait]
impl Fetcher for Bot {
    async fn fetch(&self, offset: i64, limit: u32, timeout_secs: u64) -> Result<Batch, BotError> {
        let mut params = Params::new();
        if offset > 0 {
            params.push(("offset", offset.to_string()));
        }
        if limit > 0 {
            params.push(("limit", limit.to_string()));
        }
        if timeout_secs > 0 {
            params.push(("timeout", timeout_secs.to_string()));
        }

        let timeout = self
            .request_timeout
            .max(Duration::from_secs(timeout_secs) + LONG_POLL_GRACE);
        let result = self.call_raw("getUpdates", &params, timeout).await?;
        decode_batch(result, self.malformed)
    }
}

impl Bot {
    /// One-shot `getUpdates` using the offset, limit and timeout of `config`.
    pub async fn get_updates(&self, config: &PollConfig) -> Result<Batch, BotError> {
        self.fetch(config.offset, config.limit, config.timeout_secs)
            .await
    }
}

/// Decode a `getUpdates` result entry by entry, applying `policy` to entries
/// that do not deserialize.
pub(crate) fn decode_batch(result: Value, policy: MalformedPolicy) -> Result<Batch, BotError> {
    let entries = match result {
        Value::Array(entries) => entries,
        Value::Null => Vec::new(),
        _ => {
            return Err(BotError::Transport(
                "telegram getUpdates: result is not an array".into(),
            ))
        }
    };

    let mut batch = Batch::default();
    for entry in entries {
        let id = entry.get("update_id").and_then(Value::as_i64);
        match serde_json::from_value::<Update>(entry) {
            Ok(update) => batch.updates.push(update),
            Err(e) => match policy {
                MalformedPolicy::FailBatch => {
                    return Err(BotError::Transport(format!(
                        "telegram getUpdates: malformed update {}: {e}",
                        id.map_or_else(|| "without id".to_string(), |id| id.to_string())
                    )));
                }
                MalformedPolicy::Skip => {
                    warn!("skipping malformed telegram update {id:?}: {e}");
                    if let Some(id) = id {
                        batch.skipped.push(id);
                    }
                }
            },
        }
    }

    Ok(batch)
}
