//! Lead delivery into the staff chat through the Bot API.

use async_trait::async_trait;
use leadbot_core::{DeliveryError, DeliveryGateway, Sent};
use teloxide::prelude::*;
use teloxide::{ApiError, RequestError};
use tracing::debug;

/// Posts lead texts to the configured staff chat with one `sendMessage`.
pub struct TelegramGateway {
    bot: Bot,
    destination: Option<ChatId>,
}

impl TelegramGateway {
    pub fn new(bot: Bot, destination: Option<ChatId>) -> Self {
        Self { bot, destination }
    }
}

#[async_trait]
impl DeliveryGateway for TelegramGateway {
    async fn deliver(&self, text: &str) -> Result<Sent, DeliveryError> {
        let destination = self.destination.ok_or(DeliveryError::Unconfigured)?;

        let message = self
            .bot
            .send_message(destination, text)
            .await
            .map_err(classify)?;

        debug!(chat_id = %destination, message_id = message.id.0, "Posted to staff chat");
        Ok(Sent {
            message_id: message.id.0,
        })
    }
}

/// Split transport failures into destination rejections and everything else.
pub fn classify(error: RequestError) -> DeliveryError {
    let detail = error.to_string();
    match error {
        RequestError::Api(api) if is_destination_problem(&api) => DeliveryError::Rejected(detail),
        // The group was upgraded to a supergroup with a new id.
        RequestError::MigrateToChatId(_) => DeliveryError::Rejected(detail),
        _ => DeliveryError::Unknown(detail),
    }
}

fn is_destination_problem(error: &ApiError) -> bool {
    match error {
        ApiError::ChatNotFound
        | ApiError::BotBlocked
        | ApiError::BotKicked
        | ApiError::BotKickedFromSupergroup
        | ApiError::NotEnoughRightsToPostMessages
        | ApiError::CantInitiateConversation
        | ApiError::GroupDeactivated => true,
        ApiError::Unknown(text) => {
            let text = text.to_lowercase();
            text.contains("chat not found")
                || text.contains("chat_id")
                || text.contains("peer_id_invalid")
                || text.contains("not enough rights")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_errors_are_rejections() {
        for api in [
            ApiError::ChatNotFound,
            ApiError::BotKicked,
            ApiError::NotEnoughRightsToPostMessages,
            ApiError::Unknown("Bad Request: PEER_ID_INVALID".to_string()),
        ] {
            assert!(matches!(
                classify(RequestError::Api(api)),
                DeliveryError::Rejected(_)
            ));
        }

        assert!(matches!(
            classify(RequestError::MigrateToChatId(ChatId(-1001234567890))),
            DeliveryError::Rejected(_)
        ));
    }

    #[test]
    fn test_other_errors_are_unknown() {
        let err = classify(RequestError::Api(ApiError::Unknown(
            "Bad Request: message is too long".to_string(),
        )));
        match err {
            DeliveryError::Unknown(detail) => assert!(detail.contains("message is too long")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unconfigured_makes_no_request() {
        let gateway = TelegramGateway::new(Bot::new("123:test"), None);
        assert_eq!(gateway.deliver("lead").await, Err(DeliveryError::Unconfigured));
    }
}
