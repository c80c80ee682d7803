//! teloxide handler tree and polling loop.

use std::sync::Arc;

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use weatherbot_weather::WeatherProvider;

use crate::handlers::{ButtonPress, Conversation};
use crate::transport::TelegramTransport;

/// Conversation wired to the real weather provider.
pub type BotApp = Conversation<WeatherProvider>;

type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
type HandlerResult = Result<(), HandlerError>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the menu.")]
    Start,
    #[command(description = "show usage help.")]
    Help,
    #[command(description = "look up the weather in a city.")]
    Find,
}

/// Build the update handler tree.
///
/// Commands are matched first; any other text message goes to the city
/// lookup. Non-text messages are ignored.
pub fn schema() -> UpdateHandler<HandlerError> {
    let message_handler = Update::filter_message()
        .branch(dptree::entry().filter_command::<Command>().endpoint(handle_command))
        .branch(
            dptree::filter_map(|msg: Message| msg.text().map(ToOwned::to_owned))
                .endpoint(handle_text),
        );

    let callback_handler = Update::filter_callback_query().endpoint(handle_callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_handler)
}

/// Register commands with Telegram and poll for updates until Ctrl-C.
pub async fn run(bot: Bot, app: Arc<BotApp>) {
    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    tracing::info!("Starting long polling, city routing: {:?}", app.routing());

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![app])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Dispatcher stopped");
}

async fn handle_command(bot: Bot, msg: Message, cmd: Command, app: Arc<BotApp>) -> HandlerResult {
    let tx = TelegramTransport::new(bot);
    match cmd {
        Command::Start => app.on_start(&tx, msg.chat.id).await?,
        Command::Help => app.on_help(&tx, msg.chat.id).await?,
        Command::Find => app.on_find(&tx, msg.chat.id).await?,
    }
    Ok(())
}

async fn handle_text(bot: Bot, msg: Message, text: String, app: Arc<BotApp>) -> HandlerResult {
    let tx = TelegramTransport::new(bot);
    app.on_text(&tx, msg.chat.id, &text).await?;
    Ok(())
}

async fn handle_callback(bot: Bot, q: CallbackQuery, app: Arc<BotApp>) -> HandlerResult {
    let press = button_press(&q);
    let tx = TelegramTransport::new(bot);
    app.on_button(&tx, &press).await?;
    Ok(())
}

/// Extract what the handlers need from a callback query. Without an attached
/// message (inline mode), replies go to the user's private chat.
fn button_press(q: &CallbackQuery) -> ButtonPress {
    let (chat, message) = match &q.message {
        Some(m) => (m.chat().id, Some(m.id())),
        None => (ChatId::from(q.from.id), None),
    };

    ButtonPress {
        callback_id: q.id.clone(),
        chat,
        message,
        payload: q.data.clone().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::MessageId;

    #[test]
    fn test_commands_parse() {
        assert_eq!(Command::parse("/start", "weatherbot").unwrap(), Command::Start);
        assert_eq!(Command::parse("/help", "weatherbot").unwrap(), Command::Help);
        assert_eq!(Command::parse("/find", "weatherbot").unwrap(), Command::Find);
        assert_eq!(
            Command::parse("/start@weatherbot", "weatherbot").unwrap(),
            Command::Start
        );
    }

    #[test]
    fn test_free_text_is_not_a_command() {
        assert!(Command::parse("London", "weatherbot").is_err());
        assert!(Command::parse("/forecast", "weatherbot").is_err());
    }

    #[test]
    fn test_command_descriptions() {
        let text = Command::descriptions().to_string();
        assert!(text.contains("/start"));
        assert!(text.contains("/find"));
    }

    #[test]
    fn test_callback_without_message_uses_private_chat() {
        let q: CallbackQuery = serde_json::from_value(serde_json::json!({
            "id": "4382bfdwdsb323b2d9",
            "from": {"id": 1234, "is_bot": false, "first_name": "Ann"},
            "chat_instance": "-123",
            "inline_message_id": "AAAA",
            "data": "help"
        }))
        .unwrap();

        let press = button_press(&q);
        assert_eq!(press.callback_id, "4382bfdwdsb323b2d9");
        assert_eq!(press.chat, ChatId(1234));
        assert_eq!(press.message, None);
        assert_eq!(press.payload, "help");
    }

    #[test]
    fn test_callback_with_message() {
        let q: CallbackQuery = serde_json::from_value(serde_json::json!({
            "id": "cb1",
            "from": {"id": 1234, "is_bot": false, "first_name": "Ann"},
            "chat_instance": "-123",
            "message": {
                "message_id": 77,
                "date": 1700000000,
                "chat": {"id": -1001, "type": "supergroup", "title": "Weather"},
                "from": {"id": 99, "is_bot": true, "first_name": "weatherbot"},
                "text": "Please choose:"
            },
            "data": "find"
        }))
        .unwrap();

        let press = button_press(&q);
        assert_eq!(press.chat, ChatId(-1001));
        assert_eq!(press.message, Some(MessageId(77)));
        assert_eq!(press.payload, "find");
    }
}
