use crate::{error::BotError, types::Batch};
use async_trait::async_trait;

/// Update source -- one long-poll request per call.
///
/// The HTTP Bot API client implements this against `getUpdates`; tests
/// implement it with scripted batches. A value of 0 for any argument means
/// "omit the parameter and use the service default".
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the updates with `update_id >= offset`, waiting up to
    /// `timeout_secs` for at least one to arrive.
    ///
    /// Updates come back in the order the service produced them. Every
    /// failure is reported as an error; retry policy belongs to the caller.
    async fn fetch(&self, offset: i64, limit: u32, timeout_secs: u64) -> Result<Batch, BotError>;
}
