//! Message text and inline keyboard built from paginator state

use crate::paginator::Paginator;
use crate::protocol::Command;
use crate::semantics::ItemSemantics;

const RULE: &str = "\n<b>⸻⸻⸻⸻⸻</b>\n";
const FILTERS_PER_ROW: usize = 4;
const ACTIONS_PER_ROW: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    /// Full callback data, prefix included
    pub data: String,
}

impl Button {
    fn new(text: impl Into<String>, data: String) -> Self {
        Self {
            text: text.into(),
            data,
        }
    }
}

pub type Keyboard = Vec<Vec<Button>>;

/// Everything a list message shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub keyboard: Keyboard,
}

/// Delivery call needed to bring a shown message up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    None,
    /// Text changed; resend text and keyboard together
    Text,
    KeyboardOnly,
}

impl Snapshot {
    pub fn diff(&self, next: &Snapshot) -> Edit {
        if self.text != next.text {
            Edit::Text
        } else if self.keyboard != next.keyboard {
            Edit::KeyboardOnly
        } else {
            Edit::None
        }
    }
}

impl<S: ItemSemantics> Paginator<S> {
    pub fn render(&self) -> Snapshot {
        Snapshot {
            text: self.render_text(),
            keyboard: self.render_keyboard(),
        }
    }

    fn render_text(&self) -> String {
        let (start, end) = self.page_bounds();
        let semantics = self.semantics();
        let selected = self.view().selected;

        let mut text = if start < end {
            format!("<b>results: {}-{} of {}</b>", start + 1, end, self.len())
        } else {
            "<b>the list is empty</b>".to_string()
        };
        text.push_str(RULE);

        let lines: Vec<String> = (start..end)
            .filter_map(|position| {
                let item = self.item_at(position)?;
                let is_selected = selected == Some(position);
                let line = semantics.render_line(item, is_selected);
                Some(if is_selected {
                    format!("<b>{}.</b> <u>{}</u>", position + 1, line)
                } else {
                    format!("<b>{}.</b> {}", position + 1, line)
                })
            })
            .collect();
        text.push_str(&lines.join("\n\n"));

        let visible: Vec<&S::Item> = self.list().visible().collect();
        if let Some(footer) = semantics.footer(&visible).filter(|f| !f.is_empty()) {
            text.push_str(RULE);
            text.push_str(&format!("<b>{}</b>", footer));
        }
        text
    }

    fn render_keyboard(&self) -> Keyboard {
        let prefix = self.prefix();
        let view = self.view();
        let (start, end) = self.page_bounds();
        let mut keyboard: Keyboard = Vec::new();

        let numbers: Vec<Button> = (start..end)
            .map(|position| {
                let caption = if view.selected == Some(position) {
                    format!("({})", position + 1)
                } else {
                    (position + 1).to_string()
                };
                Button::new(caption, Command::Select(position).encode(prefix))
            })
            .collect();
        if !numbers.is_empty() {
            keyboard.push(numbers);
        }

        if view.controls_visible {
            let headers: Vec<Button> = self
                .sorting()
                .headers()
                .iter()
                .map(|h| {
                    Button::new(
                        format!("{}{}", h.label, h.direction.glyph()),
                        Command::OrderBy(h.key.clone()).encode(prefix),
                    )
                })
                .collect();
            if !headers.is_empty() {
                keyboard.push(headers);
            }

            for (attribute, values) in self.filtering().iter() {
                let buttons: Vec<Button> = values
                    .iter()
                    .map(|(value, enabled)| {
                        let mark = if *enabled { "✓" } else { "" };
                        Button::new(
                            format!("{}{}", mark, value),
                            Command::FilterBy {
                                attribute: attribute.to_string(),
                                value: value.clone(),
                            }
                            .encode(prefix),
                        )
                    })
                    .collect();
                keyboard.extend(buttons.chunks(FILTERS_PER_ROW).map(|row| row.to_vec()));
            }
        }

        let prev = if view.active_page > 0 {
            Button::new("⬅", Command::PrevPage.encode(prefix))
        } else {
            Button::new("-", Command::Stub.encode(prefix))
        };
        let toggle = Button::new(
            if view.controls_visible { "🔺" } else { "🔻" },
            Command::ToggleControls.encode(prefix),
        );
        let next = if view.active_page < self.last_page() {
            Button::new("➡", Command::NextPage.encode(prefix))
        } else {
            Button::new("-", Command::Stub.encode(prefix))
        };
        keyboard.push(vec![prev, toggle, next]);

        if !view.controls_visible {
            if let Some(item) = view
                .selected
                .filter(|p| (start..end).contains(p))
                .and_then(|p| self.item_at(p))
            {
                let actions: Vec<Button> = self
                    .semantics()
                    .actions(item)
                    .into_iter()
                    .map(|action| {
                        let data = Command::Action(action.clone()).encode(prefix);
                        Button::new(action, data)
                    })
                    .collect();
                keyboard.extend(actions.chunks(ACTIONS_PER_ROW).map(|row| row.to_vec()));
            }
        }

        keyboard
    }
}
