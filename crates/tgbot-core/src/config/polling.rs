use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults::*;
use crate::error::BotError;

/// Settings for one polling session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Initial cursor. 0 = start from the earliest update the service retains.
    #[serde(default)]
    pub offset: i64,
    /// Max updates per request. 0 = service default.
    #[serde(default)]
    pub limit: u32,
    /// Long-poll duration in seconds. 0 = return immediately.
    #[serde(default)]
    pub timeout_secs: u64,
    /// Buffered updates before publishing blocks the poll loop.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 0,
            timeout_secs: 0,
            capacity: default_capacity(),
            retry: RetryPolicy::default(),
        }
    }
}

impl PollConfig {
    /// Defaults, resuming from `offset`.
    pub fn from_offset(offset: i64) -> Self {
        Self {
            offset,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), BotError> {
        if self.offset < 0 {
            return Err(BotError::Config(format!(
                "polling offset must be >= 0, got {}",
                self.offset
            )));
        }
        if self.capacity == 0 {
            return Err(BotError::Config("polling capacity must be > 0".into()));
        }
        Ok(())
    }
}

/// Delay between failed fetches.
///
/// `delay_ms = 0` retries immediately. Otherwise the delay doubles on each
/// consecutive failure, capped at `max_delay_ms`, and resets after a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default = "default_max_retry_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            max_delay_ms: default_max_retry_delay(),
        }
    }
}

impl RetryPolicy {
    pub fn immediate() -> Self {
        Self::default()
    }

    pub fn exponential(delay: Duration, max_delay: Duration) -> Self {
        Self {
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            max_delay_ms: u64::try_from(max_delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Delay to wait after the `failures`-th consecutive failure (1-based).
    pub fn delay_for(&self, failures: u32) -> Duration {
        if self.delay_ms == 0 || failures == 0 {
            return Duration::ZERO;
        }
        let cap = self.max_delay_ms.max(self.delay_ms);
        let factor = 1u64.checked_shl(failures - 1).unwrap_or(u64::MAX);
        Duration::from_millis(self.delay_ms.saturating_mul(factor).min(cap))
    }
}
