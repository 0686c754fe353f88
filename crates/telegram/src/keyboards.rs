//! Inline keyboard builders

use crate::constants::{menu, MAX_CALLBACK_DATA_LEN};
use paginator::Keyboard;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Convert a rendered list keyboard into Telegram markup
pub fn inline_markup(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    let rows = keyboard.iter().map(|row| {
        row.iter()
            .map(|button| {
                if button.data.len() > MAX_CALLBACK_DATA_LEN {
                    tracing::warn!("Callback data too long ({} bytes): {}", button.data.len(), button.data);
                }
                InlineKeyboardButton::callback(button.text.clone(), button.data.clone())
            })
            .collect::<Vec<_>>()
    });
    InlineKeyboardMarkup::new(rows)
}

/// Create a main menu keyboard
pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    let buttons = vec![
        vec![
            InlineKeyboardButton::callback("📥 Downloads", menu::DOWNLOADS),
            InlineKeyboardButton::callback("📺 Torrserver", menu::TORRSERVER),
        ],
        vec![InlineKeyboardButton::callback("❓ Help", menu::HELP)],
    ];

    InlineKeyboardMarkup::new(buttons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use paginator::Button;
    use teloxide::types::InlineKeyboardButtonKind;

    fn button(text: &str, data: &str) -> Button {
        Button {
            text: text.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_inline_markup_keeps_layout() {
        let keyboard = vec![
            vec![button("1", "list7:0"), button("(2)", "list7:1")],
            vec![button("-", "list7:stub"), button("🔻", "list7:toggle_filters"), button("➡", "list7:next_page")],
        ];
        let markup = inline_markup(&keyboard);

        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[1].len(), 3);
        assert_eq!(markup.inline_keyboard[0][1].text, "(2)");
        match &markup.inline_keyboard[1][2].kind {
            InlineKeyboardButtonKind::CallbackData(data) => assert_eq!(data, "list7:next_page"),
            other => panic!("unexpected button kind {:?}", other),
        }
    }

    #[test]
    fn test_main_menu_callbacks() {
        let markup = main_menu_keyboard();
        let data: Vec<String> = markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(data, vec!["cmd:downloads", "cmd:torrserver", "cmd:help"]);
    }
}
