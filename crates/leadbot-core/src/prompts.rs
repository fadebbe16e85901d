//! User-visible texts.

use crate::error::DeliveryError;

/// Label of the persistent button that (re)starts the flow.
pub const START_BUTTON: &str = "📝 Book a trial lesson";

pub const WELCOME: &str = "Hi! This bot books a trial lesson.";

pub const ASK_AUDIENCE: &str = "Who are the lessons for?";

pub const ASK_LANGUAGE: &str = "Choose a language:";

pub const ASK_GOAL: &str = "What is your learning goal?\n\
    For example: work, relocation, travel, school/university, conversation, exam.";

pub const ASK_NAME: &str = "What is your name?";

pub const ASK_PHONE: &str = "Please send a phone number we can reach you at (+7… or 8… is fine).";

pub const PHONE_RETRY: &str =
    "That does not look like a phone number. Please send it again (at least 10 digits).";

pub const PICK_FROM_MENU: &str = "Please pick one of the options below.";

pub const IDLE_HINT: &str = "Press the button below or send /start to book a trial lesson.";

pub const PING_TEXT: &str = "✅ Test: the bot can post to this chat";

/// Confirmation sent after the lead reached the staff chat.
pub fn confirmation(phone: &str) -> String {
    format!(
        "Thank you! Your request has been received ✅\n\
        We will call you at {} soon.",
        phone
    )
}

/// Explanation sent to the user when the lead could not be delivered.
pub fn delivery_failed(error: &DeliveryError) -> String {
    match error {
        DeliveryError::Unconfigured => "⚠️ The staff chat is not configured.\n\
            Set the ADMIN_CHAT_ID variable to the managers' chat id.\n\
            Your answers are kept: send the phone number again to retry, or /start to begin anew."
            .to_string(),
        DeliveryError::Rejected(detail) => format!(
            "⚠️ Could not pass your request to the managers ({}).\n\
            Check ADMIN_CHAT_ID and the bot's rights in that chat.\n\
            Hint: supergroup ids usually start with -100…\n\
            Your answers are kept: send the phone number again to retry.",
            detail
        ),
        DeliveryError::Unknown(detail) => format!(
            "⚠️ Could not pass your request to the managers ({}).\n\
            Your answers are kept: send the phone number again to retry.",
            detail
        ),
    }
}

/// Report for the destination ping command.
pub fn ping_result(result: &Result<(), DeliveryError>) -> String {
    match result {
        Ok(()) => "Sent a test message to the staff chat ✅".to_string(),
        Err(DeliveryError::Unconfigured) => {
            "ADMIN_CHAT_ID is not set. Configure it in the environment first.".to_string()
        }
        Err(e) => format!(
            "Could not post to the staff chat ❌\n{}\n\n\
            Most common causes:\n\
            1) wrong ADMIN_CHAT_ID (supergroups use -100…)\n\
            2) the bot is not a member of the chat\n\
            3) bots may not post in the chat / missing rights",
            e
        ),
    }
}

/// Reply to the chat id command.
pub fn chat_id(id: i64) -> String {
    format!("chat_id of this chat: {}", id)
}
