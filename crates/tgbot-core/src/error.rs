use thiserror::Error;

/// Top-level error type for tgbot.
#[derive(Debug, Error)]
pub enum BotError {
    /// Network failure or a response body that could not be decoded.
    #[error("transport error: {0}")]
    Transport(String),

    /// The Bot API answered with `ok: false`.
    #[error("service error: {description}")]
    Service {
        code: Option<i64>,
        description: String,
    },

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}
