//! The two-option menu shown after /start and after each successful lookup.

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub const MENU_PROMPT: &str = "Please choose:";

/// Options a menu button can carry as its callback payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Find,
    Help,
}

impl MenuOption {
    pub fn payload(self) -> &'static str {
        match self {
            Self::Find => "find",
            Self::Help => "help",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Find => "Find city",
            Self::Help => "Help",
        }
    }

    /// Parse a callback payload. Unknown payloads yield `None`.
    pub fn from_payload(payload: &str) -> Option<Self> {
        match payload {
            "find" => Some(Self::Find),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: &'static str,
    pub payload: &'static str,
}

impl From<MenuOption> for MenuButton {
    fn from(option: MenuOption) -> Self {
        Self {
            label: option.label(),
            payload: option.payload(),
        }
    }
}

/// Prompt text plus button rows, independent of the chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub prompt: &'static str,
    pub rows: Vec<Vec<MenuButton>>,
}

/// Build the menu: "Find city" on the first row, "Help" on the second.
pub fn build_menu() -> Menu {
    Menu {
        prompt: MENU_PROMPT,
        rows: vec![
            vec![MenuOption::Find.into()],
            vec![MenuOption::Help.into()],
        ],
    }
}

impl From<&Menu> for InlineKeyboardMarkup {
    fn from(menu: &Menu) -> Self {
        InlineKeyboardMarkup::new(menu.rows.iter().map(|row| {
            row.iter()
                .map(|b| InlineKeyboardButton::callback(b.label, b.payload))
                .collect::<Vec<_>>()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    #[test]
    fn test_menu_layout() {
        let menu = build_menu();
        assert_eq!(menu.prompt, "Please choose:");
        assert_eq!(menu.rows.len(), 2);
        assert!(menu.rows.iter().all(|row| row.len() == 1));
        assert_eq!(menu.rows[0][0].label, "Find city");
        assert_eq!(menu.rows[0][0].payload, "find");
        assert_eq!(menu.rows[1][0].label, "Help");
        assert_eq!(menu.rows[1][0].payload, "help");
    }

    #[test]
    fn test_menu_is_deterministic() {
        assert_eq!(build_menu(), build_menu());
    }

    #[test]
    fn test_payload_round_trip() {
        for option in [MenuOption::Find, MenuOption::Help] {
            assert_eq!(MenuOption::from_payload(option.payload()), Some(option));
        }
        assert_eq!(MenuOption::from_payload("settings"), None);
        assert_eq!(MenuOption::from_payload("FIND"), None);
    }

    #[test]
    fn test_inline_keyboard_conversion() {
        let markup = InlineKeyboardMarkup::from(&build_menu());
        assert_eq!(markup.inline_keyboard.len(), 2);

        let first = &markup.inline_keyboard[0][0];
        assert_eq!(first.text, "Find city");
        assert!(matches!(
            &first.kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "find"
        ));

        let second = &markup.inline_keyboard[1][0];
        assert_eq!(second.text, "Help");
        assert!(matches!(
            &second.kind,
            InlineKeyboardButtonKind::CallbackData(data) if data == "help"
        ));
    }
}
