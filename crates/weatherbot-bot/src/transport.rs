//! Outbound side of the chat transport.
//!
//! Handlers only talk to [`Transport`]; [`TelegramTransport`] is the
//! production implementation over a teloxide `Bot`.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MessageId};

use crate::error::BotError;
use crate::menu::Menu;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), BotError>;

    /// Send the menu prompt with its buttons.
    async fn send_menu(&self, chat: ChatId, menu: &Menu) -> Result<(), BotError>;

    /// Acknowledge a button press so the client stops its spinner.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), BotError>;

    /// Replace the text of an already-sent message.
    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str) -> Result<(), BotError>;
}

#[derive(Debug, Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), BotError> {
        self.bot.send_message(chat, text).await?;
        Ok(())
    }

    async fn send_menu(&self, chat: ChatId, menu: &Menu) -> Result<(), BotError> {
        self.bot
            .send_message(chat, menu.prompt)
            .reply_markup(InlineKeyboardMarkup::from(menu))
            .await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), BotError> {
        self.bot.answer_callback_query(callback_id.to_owned()).await?;
        Ok(())
    }

    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str) -> Result<(), BotError> {
        self.bot.edit_message_text(chat, message, text).await?;
        Ok(())
    }
}
