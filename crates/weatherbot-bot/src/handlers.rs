//! Conversation handlers: map each inbound event to outbound messages.

use async_trait::async_trait;
use teloxide::types::{ChatId, MessageId};
use tracing::instrument;
use weatherbot_core::CityRouting;
use weatherbot_weather::{WeatherError, WeatherProvider, WeatherReport};

use crate::error::BotError;
use crate::menu::{build_menu, MenuOption};
use crate::reply;
use crate::state::{ChatState, ChatStates};
use crate::transport::Transport;

/// City name to current weather, as used by the handlers.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn find_weather(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

#[async_trait]
impl WeatherLookup for WeatherProvider {
    async fn find_weather(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        WeatherProvider::find_weather(self, city).await
    }
}

/// An inline button press.
#[derive(Debug, Clone)]
pub struct ButtonPress {
    pub callback_id: String,
    pub chat: ChatId,
    /// Message carrying the menu, when Telegram still exposes it
    pub message: Option<MessageId>,
    pub payload: String,
}

pub struct Conversation<L> {
    lookup: L,
    states: ChatStates,
    routing: CityRouting,
}

impl<L: WeatherLookup> Conversation<L> {
    pub fn new(lookup: L, routing: CityRouting) -> Self {
        Self {
            lookup,
            states: ChatStates::new(),
            routing,
        }
    }

    pub fn routing(&self) -> CityRouting {
        self.routing
    }

    pub fn chat_state(&self, chat: ChatId) -> ChatState {
        self.states.get(chat)
    }

    /// /start: show the menu.
    #[instrument(skip(self, tx))]
    pub async fn on_start(&self, tx: &dyn Transport, chat: ChatId) -> Result<(), BotError> {
        self.states.update(chat, ChatState::on_menu);
        tx.send_menu(chat, &build_menu()).await
    }

    /// /help: usage text.
    #[instrument(skip(self, tx))]
    pub async fn on_help(&self, tx: &dyn Transport, chat: ChatId) -> Result<(), BotError> {
        self.states.update(chat, ChatState::on_menu);
        tx.send_text(chat, reply::HELP_TEXT).await
    }

    /// "Find city" / find: ask for a city name.
    #[instrument(skip(self, tx))]
    pub async fn on_find(&self, tx: &dyn Transport, chat: ChatId) -> Result<(), BotError> {
        self.states.update(chat, ChatState::on_find);
        tracing::debug!("{} chats awaiting a city", self.states.awaiting_count());
        tx.send_text(chat, reply::FIND_PROMPT).await
    }

    /// Button press: acknowledge it, replace the menu text with the chosen
    /// option, then run the matching command. Unknown payloads stop after
    /// the echo.
    #[instrument(skip(self, tx, press), fields(chat = press.chat.0, payload = %press.payload))]
    pub async fn on_button(&self, tx: &dyn Transport, press: &ButtonPress) -> Result<(), BotError> {
        tx.answer_callback(&press.callback_id).await?;

        match press.message {
            Some(message) => {
                tx.edit_text(press.chat, message, &reply::selected_option(&press.payload))
                    .await?
            }
            None => tracing::debug!("Button message unavailable, skipping edit"),
        }

        match MenuOption::from_payload(&press.payload) {
            Some(MenuOption::Help) => self.on_help(tx, press.chat).await,
            Some(MenuOption::Find) => self.on_find(tx, press.chat).await,
            None => {
                tracing::warn!("Unknown button payload: {}", press.payload);
                Ok(())
            }
        }
    }

    /// Free text: look the city up, unless routing requires the find prompt first.
    #[instrument(skip(self, tx, text))]
    pub async fn on_text(&self, tx: &dyn Transport, chat: ChatId, text: &str) -> Result<(), BotError> {
        let expects_city = self.states.get(chat).expects_city();
        if self.routing == CityRouting::AfterPrompt && !expects_city {
            tracing::debug!("Text outside of find prompt, sending hint");
            return tx.send_text(chat, reply::FIND_FIRST_HINT).await;
        }

        let result = self.lookup.find_weather(text).await;
        self.states.update(chat, ChatState::on_lookup_done);

        match result {
            Ok(report) => {
                tx.send_text(chat, &reply::format_reply(&report)).await?;
                tx.send_menu(chat, &build_menu()).await
            }
            Err(e) if e.is_not_found() => {
                tracing::info!("City not found: {:?}", text.trim());
                tx.send_text(chat, reply::NOT_FOUND_TEXT).await
            }
            Err(e) => {
                tracing::error!("Weather lookup failed: {}", e);
                tx.send_text(chat, e.user_message()).await
            }
        }
    }
}
