//! # tgbot-api
//!
//! Telegram Bot API client and the long-polling loop that turns `getUpdates`
//! into a stream of [`Update`](tgbot_core::types::Update)s.

pub mod bot;
pub mod polling;

pub use bot::Bot;
pub use polling::{Poller, PollerState, StopHandle};
