//! Request transport and response envelope handling.

use super::Bot;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tgbot_core::{error::BotError, types::ApiResponse};
use tracing::debug;

/// Form parameters of one Bot API call.
pub type Params = Vec<(&'static str, String)>;

impl Bot {
    /// Call `method` and decode its `result` into `T`.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &Params,
    ) -> Result<T, BotError> {
        let result = self.call_raw(method, params, self.request_timeout).await?;
        serde_json::from_value(result)
            .map_err(|e| BotError::Transport(format!("telegram {method}: malformed result: {e}")))
    }

    /// Call `method` and return the raw `result` of a successful envelope.
    pub(crate) async fn call_raw(
        &self,
        method: &str,
        params: &Params,
        timeout: Duration,
    ) -> Result<Value, BotError> {
        let url = format!("{}/{method}", self.base_url);

        // `without_url` keeps the bot token out of error messages.
        let resp = self
            .client
            .post(&url)
            .form(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                BotError::Transport(format!("telegram {method} failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            BotError::Transport(format!("telegram {method} read failed: {}", e.without_url()))
        })?;

        debug!(method, %status, "telegram response: {body}");
        parse_envelope(method, &body)
    }
}

/// Unwrap the `{ok, result, description, error_code}` envelope.
///
/// The HTTP status is not consulted: the Bot API reports failures in the body.
pub(crate) fn parse_envelope(method: &str, body: &str) -> Result<Value, BotError> {
    let envelope: ApiResponse<Value> = serde_json::from_str(body)
        .map_err(|e| BotError::Transport(format!("telegram {method}: malformed response: {e}")))?;

    if !envelope.ok {
        return Err(BotError::Service {
            code: envelope.error_code,
            description: envelope
                .description
                .unwrap_or_else(|| format!("{method} failed")),
        });
    }

    Ok(envelope.result.unwrap_or(Value::Null))
}
