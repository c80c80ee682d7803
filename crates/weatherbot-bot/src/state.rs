//! Per-chat conversation state.
//!
//! A chat is `AwaitingCity` between the "Find city" prompt and the next
//! lookup attempt, and `Idle` otherwise.

use parking_lot::Mutex;
use std::collections::HashMap;
use teloxide::types::ChatId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatState {
    #[default]
    Idle,
    AwaitingCity,
}

impl ChatState {
    /// State after the "Find city" prompt was sent.
    pub fn on_find(self) -> Self {
        ChatState::AwaitingCity
    }

    /// State after /start, /help or the help button.
    pub fn on_menu(self) -> Self {
        ChatState::Idle
    }

    /// State after a lookup attempt, whatever its outcome.
    pub fn on_lookup_done(self) -> Self {
        ChatState::Idle
    }

    pub fn expects_city(self) -> bool {
        matches!(self, ChatState::AwaitingCity)
    }
}

/// In-memory state table. Idle chats are not stored.
///
/// A chat that asks for "Find city" and never answers keeps its entry for
/// the life of the process, so the table grows with the number of chats.
#[derive(Debug, Default)]
pub struct ChatStates {
    inner: Mutex<HashMap<ChatId, ChatState>>,
}

impl ChatStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chat: ChatId) -> ChatState {
        self.inner.lock().get(&chat).copied().unwrap_or_default()
    }

    /// Apply a transition and return the new state.
    pub fn update(&self, chat: ChatId, transition: impl FnOnce(ChatState) -> ChatState) -> ChatState {
        let mut states = self.inner.lock();
        let current = states.get(&chat).copied().unwrap_or_default();
        let next = transition(current);

        if next == ChatState::Idle {
            states.remove(&chat);
        } else {
            states.insert(chat, next);
        }

        if next != current {
            tracing::debug!("Chat {} state {:?} -> {:?}", chat.0, current, next);
        }
        next
    }

    /// Number of chats currently waiting for a city name.
    pub fn awaiting_count(&self) -> usize {
        self.inner.lock().len()
    }
}
