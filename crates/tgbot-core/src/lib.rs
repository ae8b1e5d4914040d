//! # tgbot-core
//!
//! Core types, traits, configuration, and error handling for the tgbot client.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
