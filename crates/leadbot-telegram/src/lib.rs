//! Telegram front end for the lead intake bot.
//!
//! Walks prospective students through a short questionnaire and posts each
//! completed request to a staff chat.
//!
//! # Environment Variables
//!
//! Required:
//! - `BOT_TOKEN`: Bot token from @BotFather
//!
//! Optional:
//! - `ADMIN_CHAT_ID`: Staff chat receiving leads (use `/chatid` there to find it)
//! - `PORT`: Health probe port (default: 10000)
//! - `SESSION_TTL_SECS`: Idle session lifetime (default: 86400)
//!
//! # Commands
//!
//! - `/start` - Start (or restart) the questionnaire
//! - `/help` - Show available commands
//! - `/chatid` - Show the id of the current chat
//! - `/pingadmin` - Send a test message to the staff chat

pub mod bot;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod health;

pub use bot::LeadBot;
pub use config::BotConfig;
pub use error::{BotError, Result};
pub use gateway::TelegramGateway;
