//! Error types for the Telegram front end.

use thiserror::Error;

/// Errors that stop the bot from starting or running.
#[derive(Debug, Error)]
pub enum BotError {
    /// Bot token not provided.
    #[error("Bot token not set. Set the BOT_TOKEN environment variable.")]
    NoToken,

    /// ADMIN_CHAT_ID is set but is not a chat id.
    #[error("ADMIN_CHAT_ID must be an integer chat id, got {0:?}")]
    InvalidAdminChatId(String),

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// IO error, e.g. the health probe port is taken.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;
