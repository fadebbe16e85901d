//! Update handlers: turn Telegram updates into intake events and send the
//! resulting replies back.

use std::future::Future;
use std::sync::Arc;

use leadbot_core::prompts::{self, START_BUTTON};
use leadbot_core::{Audience, Choice, Event, Intake, Keyboard, Language, Reply, Sender, SessionKey};
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup,
    ReplyMarkup, User,
};
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Book a trial lesson (restarts the questions)")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Show the id of this chat")]
    ChatId,

    #[command(description = "Send a test message to the staff chat")]
    PingAdmin,
}

/// Audience buttons are stacked one per row.
const AUDIENCE_COLUMNS: usize = 1;

const LANGUAGE_COLUMNS: usize = 2;

fn inline_menu(choices: Vec<Choice>, columns: usize) -> InlineKeyboardMarkup {
    let buttons: Vec<InlineKeyboardButton> = choices
        .into_iter()
        .map(|c| InlineKeyboardButton::callback(c.label(), c.tag()))
        .collect();
    InlineKeyboardMarkup::new(buttons.chunks(columns).map(|row| row.to_vec()))
}

/// Render a reply keyboard as Telegram markup.
pub fn keyboard_markup(keyboard: Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Audience => ReplyMarkup::InlineKeyboard(inline_menu(
            Audience::ALL.into_iter().map(Choice::Audience).collect(),
            AUDIENCE_COLUMNS,
        )),
        Keyboard::Language => ReplyMarkup::InlineKeyboard(inline_menu(
            Language::ALL.into_iter().map(Choice::Language).collect(),
            LANGUAGE_COLUMNS,
        )),
        Keyboard::StartButton => ReplyMarkup::Keyboard(
            KeyboardMarkup::new(vec![vec![KeyboardButton::new(START_BUTTON)]])
                .resize_keyboard()
                .persistent(),
        ),
    }
}

fn sender_of(user: &User) -> Sender {
    let mut sender = Sender::new(user.id.0).with_full_name(user.full_name());
    if let Some(username) = &user.username {
        sender = sender.with_username(username.clone());
    }
    sender
}

/// Map a message's text to an event; the start button arrives as its label.
/// Messages without text (stickers, photos, contacts) count as empty text.
pub fn text_event(text: Option<&str>) -> Event {
    let text = text.unwrap_or_default();
    if text.trim() == START_BUTTON {
        Event::Start
    } else {
        Event::Text(text.to_string())
    }
}

/// Whether a message text is a slash command.
pub fn is_command_text(text: Option<&str>) -> bool {
    text.map(|t| t.starts_with('/')).unwrap_or(false)
}

/// Reply to a slash command that did not parse.
pub fn unknown_command_reply(text: &str) -> String {
    format!(
        "Unknown command: {}\n\nUse /help to see available commands.",
        text.split_whitespace().next().unwrap_or(text)
    )
}

/// Apply a menu choice, then acknowledge the button press.
///
/// The choice is applied first so a failed acknowledgement (expired query,
/// network error) never loses it; such failures are only logged.
pub async fn apply_choice<A>(
    intake: &Intake,
    key: SessionKey,
    sender: &Sender,
    choice: Choice,
    acknowledge: A,
) -> Vec<Reply>
where
    A: Future<Output = ResponseResult<()>>,
{
    let replies = intake.handle(key, sender, Event::Choice(choice)).await;
    log_failed_acknowledge(acknowledge.await);
    replies
}

fn log_failed_acknowledge(result: ResponseResult<()>) {
    if let Err(e) = result {
        warn!(error = %e, "Failed to answer callback query");
    }
}

async fn send_replies(bot: &Bot, chat_id: ChatId, replies: Vec<Reply>) -> ResponseResult<()> {
    for reply in replies {
        let mut req = bot.send_message(chat_id, reply.text);
        if let Some(keyboard) = reply.keyboard {
            req = req.reply_markup(keyboard_markup(keyboard));
        }
        req.await?;
    }
    Ok(())
}

async fn run_event(
    bot: &Bot,
    chat_id: ChatId,
    user: &User,
    event: Event,
    intake: &Intake,
) -> ResponseResult<()> {
    let key = SessionKey::new(chat_id.0, user.id.0);
    let replies = intake.handle(key, &sender_of(user), event).await;
    send_replies(bot, chat_id, replies).await
}

/// Handle the /start command.
pub async fn handle_start(bot: Bot, msg: Message, intake: Arc<Intake>) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    info!(chat_id = %msg.chat.id, user = ?user.username, "User started intake");
    run_event(&bot, msg.chat.id, user, Event::Start, &intake).await
}

/// Handle the /help command.
pub async fn handle_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    let help_text = Command::descriptions().to_string();
    bot.send_message(msg.chat.id, help_text).await?;
    Ok(())
}

/// Handle the /chatid command.
pub async fn handle_chat_id(bot: Bot, msg: Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, prompts::chat_id(msg.chat.id.0))
        .await?;
    Ok(())
}

/// Handle the /pingadmin command - one test post to the staff chat.
pub async fn handle_ping_admin(bot: Bot, msg: Message, intake: Arc<Intake>) -> ResponseResult<()> {
    let report = intake.ping_destination().await;
    bot.send_message(msg.chat.id, report).await?;
    Ok(())
}

/// Dispatch commands to appropriate handlers.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    intake: Arc<Intake>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => handle_start(bot, msg, intake).await,
        Command::Help => handle_help(bot, msg).await,
        Command::ChatId => handle_chat_id(bot, msg).await,
        Command::PingAdmin => handle_ping_admin(bot, msg, intake).await,
    }
}

/// Handle regular messages (answers to the current question).
pub async fn handle_message(bot: Bot, msg: Message, intake: Arc<Intake>) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    debug!(chat_id = %msg.chat.id, user_id = user.id.0, has_text = msg.text().is_some(), "Message received");
    run_event(&bot, msg.chat.id, user, text_event(msg.text()), &intake).await
}

/// Handle slash commands that did not parse.
pub async fn handle_unknown_command(bot: Bot, msg: Message) -> ResponseResult<()> {
    if let Some(text) = msg.text() {
        info!(cmd = %text, "Unrecognized command - sending response");
        bot.send_message(msg.chat.id, unknown_command_reply(text))
            .await?;
    }
    Ok(())
}

/// Handle inline button presses.
pub async fn handle_callback(bot: Bot, q: CallbackQuery, intake: Arc<Intake>) -> ResponseResult<()> {
    let acknowledge = {
        let bot = bot.clone();
        let id = q.id.clone();
        async move { bot.answer_callback_query(id).await.map(|_| ()) }
    };

    let chat_id = q.message.as_ref().map(|m| m.chat().id);
    let choice = q.data.as_deref().and_then(Choice::from_tag);
    let (Some(chat_id), Some(choice)) = (chat_id, choice) else {
        debug!(data = ?q.data, "Ignoring callback without chat or known data");
        log_failed_acknowledge(acknowledge.await);
        return Ok(());
    };

    debug!(chat_id = %chat_id, user_id = q.from.id.0, tag = %choice.tag(), "Menu choice");
    let key = SessionKey::new(chat_id.0, q.from.id.0);
    let replies = apply_choice(&intake, key, &sender_of(&q.from), choice, acknowledge).await;
    send_replies(&bot, chat_id, replies).await
}
