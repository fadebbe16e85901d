//! Main Telegram bot implementation.

use std::sync::Arc;
use std::time::Duration;

use leadbot_core::{InMemorySessionStore, Intake};
use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::MessageKind;
use tokio::time::interval;
use tracing::{info, warn};

use crate::config::BotConfig;
use crate::error::{BotError, Result};
use crate::gateway::TelegramGateway;
use crate::handlers::{
    handle_callback, handle_command, handle_message, handle_unknown_command, is_command_text,
    Command,
};

/// How often expired sessions are swept from memory.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// The lead intake bot.
pub struct LeadBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Intake flow shared across handlers.
    intake: Arc<Intake>,
    /// Session store, kept for the sweeper.
    sessions: Arc<InMemorySessionStore>,
}

impl LeadBot {
    /// Create a bot from configuration. No network calls are made.
    pub fn new(config: &BotConfig) -> Self {
        let bot = Bot::new(&config.token);
        let sessions = Arc::new(InMemorySessionStore::new(config.session_ttl));
        let gateway = Arc::new(TelegramGateway::new(bot.clone(), config.admin_chat_id));

        if config.admin_chat_id.is_none() {
            warn!("ADMIN_CHAT_ID not set - leads cannot be delivered until it is configured");
        }

        let intake = Arc::new(Intake::new(sessions.clone(), gateway));

        Self {
            bot,
            intake,
            sessions,
        }
    }

    /// Get the bot's username, verifying the token.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| BotError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Run the bot in long-polling mode until Ctrl+C.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        let sweep_sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            sweep_sessions_loop(sweep_sessions).await;
        });

        let intake_for_commands = Arc::clone(&self.intake);
        let intake_for_messages = Arc::clone(&self.intake);
        let intake_for_callbacks = Arc::clone(&self.intake);

        let handler = dptree::entry()
            .branch(
                Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
                    let intake = Arc::clone(&intake_for_callbacks);
                    async move { handle_callback(bot, q, intake).await }
                }),
            )
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let intake = Arc::clone(&intake_for_commands);
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, intake).await }
                    }),
            )
            .branch(
                // Slash commands that did not parse
                Update::filter_message()
                    .filter(|msg: Message| is_command_text(msg.text()))
                    .endpoint(handle_unknown_command),
            )
            .branch(
                // Answers, including stickers and photos; service messages are skipped
                Update::filter_message()
                    .filter(|msg: Message| {
                        matches!(msg.kind, MessageKind::Common(_)) && !is_command_text(msg.text())
                    })
                    .endpoint(move |bot: Bot, msg: Message| {
                        let intake = Arc::clone(&intake_for_messages);
                        async move { handle_message(bot, msg, intake).await }
                    }),
            );

        info!("Bot is running! Send /start to begin.");

        // The default distribution function serializes updates per chat.
        Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|upd| async move {
                warn!("Unhandled update: {:?}", upd);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}

/// Background task dropping sessions that were abandoned mid-flow.
async fn sweep_sessions_loop(sessions: Arc<InMemorySessionStore>) {
    let mut sweep_interval = interval(SESSION_SWEEP_INTERVAL);

    loop {
        sweep_interval.tick().await;
        let removed = sessions.evict_expired().await;
        if removed > 0 {
            info!(removed, "Expired intake sessions removed");
        }
    }
}
