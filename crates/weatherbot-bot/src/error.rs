//! Bot-level error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Telegram request failed: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Failures from `Transport` implementations other than Telegram.
    #[error("Transport error: {0}")]
    Transport(String),
}
