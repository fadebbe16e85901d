//! Bot configuration.
//!
//! # Environment Variables
//!
//! - `BOT_TOKEN` (or `TELEGRAM_BOT_TOKEN`): required bot token
//! - `ADMIN_CHAT_ID`: staff chat receiving leads; supergroup ids look like
//!   `-1001234567890`. Leads cannot be delivered while it is unset.
//! - `PORT`: health probe port
//! - `SESSION_TTL_SECS`: idle session lifetime, `0` disables expiry

use std::time::Duration;

use teloxide::types::ChatId;

use crate::error::{BotError, Result};

pub const TOKEN_ENV: &str = "BOT_TOKEN";

/// Name used by earlier deployments, read when `BOT_TOKEN` is absent.
pub const LEGACY_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

pub const ADMIN_CHAT_ENV: &str = "ADMIN_CHAT_ID";

/// Default health probe port.
pub const DEFAULT_HEALTH_PORT: u16 = 10000;

/// Default idle session lifetime in seconds (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Runtime configuration of the bot.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// Staff chat, `None` when not configured.
    pub admin_chat_id: Option<ChatId>,
    pub health_port: u16,
    /// `None` keeps sessions until they complete or restart.
    pub session_ttl: Option<Duration>,
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let token = non_empty(TOKEN_ENV)
            .or_else(|| non_empty(LEGACY_TOKEN_ENV))
            .ok_or(BotError::NoToken)?;

        let admin_chat_id = non_empty(ADMIN_CHAT_ENV)
            .map(|raw| {
                raw.parse::<i64>()
                    .map(ChatId)
                    .map_err(|_| BotError::InvalidAdminChatId(raw))
            })
            .transpose()?;

        Ok(Self {
            token,
            admin_chat_id,
            health_port: DEFAULT_HEALTH_PORT,
            session_ttl: Some(Duration::from_secs(DEFAULT_SESSION_TTL_SECS)),
        })
    }

    /// Sets the health probe port.
    pub fn with_health_port(mut self, port: u16) -> Self {
        self.health_port = port;
        self
    }

    /// Sets the idle session lifetime; `0` disables expiry.
    pub fn with_session_ttl_secs(mut self, secs: u64) -> Self {
        self.session_ttl = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }

    /// Returns the health probe bind address.
    pub fn health_address(&self) -> String {
        format!("0.0.0.0:{}", self.health_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = BotConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, BotError::NoToken));

        let err = BotConfig::from_lookup(lookup(&[(TOKEN_ENV, "   ")])).unwrap_err();
        assert!(matches!(err, BotError::NoToken));
    }

    #[test]
    fn test_legacy_token_name() {
        let config = BotConfig::from_lookup(lookup(&[(LEGACY_TOKEN_ENV, "abc")])).unwrap();
        assert_eq!(config.token, "abc");

        let config =
            BotConfig::from_lookup(lookup(&[(TOKEN_ENV, "new"), (LEGACY_TOKEN_ENV, "old")]))
                .unwrap();
        assert_eq!(config.token, "new");
    }

    #[test]
    fn test_admin_chat_id() {
        let config = BotConfig::from_lookup(lookup(&[
            (TOKEN_ENV, "t"),
            (ADMIN_CHAT_ENV, " -1001234567890 "),
        ]))
        .unwrap();
        assert_eq!(config.admin_chat_id, Some(ChatId(-1001234567890)));

        let config =
            BotConfig::from_lookup(lookup(&[(TOKEN_ENV, "t"), (ADMIN_CHAT_ENV, "")])).unwrap();
        assert_eq!(config.admin_chat_id, None);
    }

    #[test]
    fn test_malformed_admin_chat_id() {
        let err = BotConfig::from_lookup(lookup(&[(TOKEN_ENV, "t"), (ADMIN_CHAT_ENV, "@staff")]))
            .unwrap_err();
        assert!(matches!(err, BotError::InvalidAdminChatId(ref raw) if raw == "@staff"));
    }

    #[test]
    fn test_defaults_and_overrides() {
        let config = BotConfig::from_lookup(lookup(&[(TOKEN_ENV, "t")])).unwrap();
        assert_eq!(config.health_port, DEFAULT_HEALTH_PORT);
        assert_eq!(config.session_ttl, Some(Duration::from_secs(86400)));
        assert_eq!(config.health_address(), "0.0.0.0:10000");

        let config = config.with_health_port(8080).with_session_ttl_secs(0);
        assert_eq!(config.health_address(), "0.0.0.0:8080");
        assert_eq!(config.session_ttl, None);
    }
}
