//! Telegram conversation layer for the weather bot.
//!
//! Provides the menu, per-chat conversation state, the handlers that turn
//! inbound events into replies, and the teloxide dispatch tree.

pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod menu;
pub mod reply;
pub mod state;
pub mod transport;

pub use error::BotError;
pub use handlers::{ButtonPress, Conversation, WeatherLookup};
pub use menu::{build_menu, Menu, MenuButton, MenuOption};
pub use state::{ChatState, ChatStates};
pub use transport::{TelegramTransport, Transport};
