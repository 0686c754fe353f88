//! Callback-data wire format
//!
//! Every button carries `<prefix><payload>`. The payload is one of:
//! - a decimal position in the visible list (select that item)
//! - `next_page`, `prev_page`, `toggle_filters` or the inert `stub`
//! - a 10-byte tag followed by its argument: `#order_by#<key>`,
//!   `#filterby#<key>/<value>`, `#action__#<action>`
//!
//! Attribute keys and values must not contain `/`.

use crate::error::ProtocolError;

pub const ORDER_BY: &str = "#order_by#";
pub const FILTER_BY: &str = "#filterby#";
pub const ACTION: &str = "#action__#";
pub const NEXT_PAGE: &str = "next_page";
pub const PREV_PAGE: &str = "prev_page";
pub const TOGGLE_FILTERS: &str = "toggle_filters";
pub const STUB: &str = "stub";

const TAG_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(usize),
    NextPage,
    PrevPage,
    ToggleControls,
    /// Placeholder button; does nothing
    Stub,
    OrderBy(String),
    FilterBy { attribute: String, value: String },
    Action(String),
}

impl Command {
    /// Parse a payload with the session prefix already stripped
    pub fn decode(payload: &str) -> Result<Command, ProtocolError> {
        let Some(first) = payload.chars().next() else {
            return Err(ProtocolError::Empty);
        };

        if first.is_ascii_digit() {
            return payload
                .parse::<usize>()
                .map(Command::Select)
                .map_err(|_| ProtocolError::BadIndex(payload.to_string()));
        }

        match payload {
            NEXT_PAGE => return Ok(Command::NextPage),
            PREV_PAGE => return Ok(Command::PrevPage),
            TOGGLE_FILTERS => return Ok(Command::ToggleControls),
            STUB => return Ok(Command::Stub),
            _ => {}
        }

        let (tag, argument) = match (payload.get(..TAG_LEN), payload.get(TAG_LEN..)) {
            (Some(tag), Some(argument)) if !argument.is_empty() => (tag, argument),
            _ => return Err(ProtocolError::UnknownCommand(payload.to_string())),
        };

        match tag {
            ORDER_BY => Ok(Command::OrderBy(argument.to_string())),
            ACTION => Ok(Command::Action(argument.to_string())),
            FILTER_BY => match argument.split_once('/') {
                Some((attribute, value)) => Ok(Command::FilterBy {
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                }),
                None => Err(ProtocolError::MissingSeparator(argument.to_string())),
            },
            _ => Err(ProtocolError::UnknownCommand(payload.to_string())),
        }
    }

    /// Full callback data for a button of the session with this prefix
    pub fn encode(&self, prefix: &str) -> String {
        match self {
            Command::Select(position) => format!("{}{}", prefix, position),
            Command::NextPage => format!("{}{}", prefix, NEXT_PAGE),
            Command::PrevPage => format!("{}{}", prefix, PREV_PAGE),
            Command::ToggleControls => format!("{}{}", prefix, TOGGLE_FILTERS),
            Command::Stub => format!("{}{}", prefix, STUB),
            Command::OrderBy(key) => format!("{}{}{}", prefix, ORDER_BY, key),
            Command::FilterBy { attribute, value } => {
                format!("{}{}{}/{}", prefix, FILTER_BY, attribute, value)
            }
            Command::Action(action) => format!("{}{}{}", prefix, ACTION, action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_ten_bytes() {
        assert_eq!(ORDER_BY.len(), TAG_LEN);
        assert_eq!(FILTER_BY.len(), TAG_LEN);
        assert_eq!(ACTION.len(), TAG_LEN);
    }

    #[test]
    fn test_decode_select() {
        assert_eq!(Command::decode("0"), Ok(Command::Select(0)));
        assert_eq!(Command::decode("17"), Ok(Command::Select(17)));
        assert_eq!(Command::decode("1x"), Err(ProtocolError::BadIndex("1x".into())));
    }

    #[test]
    fn test_decode_literals() {
        assert_eq!(Command::decode("next_page"), Ok(Command::NextPage));
        assert_eq!(Command::decode("prev_page"), Ok(Command::PrevPage));
        assert_eq!(Command::decode("toggle_filters"), Ok(Command::ToggleControls));
        assert_eq!(Command::decode("stub"), Ok(Command::Stub));
    }

    #[test]
    fn test_decode_tagged() {
        assert_eq!(
            Command::decode("#order_by#size"),
            Ok(Command::OrderBy("size".into()))
        );
        assert_eq!(
            Command::decode("#filterby#tracker/rutor"),
            Ok(Command::FilterBy {
                attribute: "tracker".into(),
                value: "rutor".into()
            })
        );
        assert_eq!(
            Command::decode("#action__#web page"),
            Ok(Command::Action("web page".into()))
        );
    }

    #[test]
    fn test_decode_filter_value_may_be_empty() {
        assert_eq!(
            Command::decode("#filterby#status/"),
            Ok(Command::FilterBy {
                attribute: "status".into(),
                value: String::new()
            })
        );
    }

    #[test]
    fn test_decode_malformed() {
        assert_eq!(Command::decode(""), Err(ProtocolError::Empty));
        assert!(matches!(Command::decode("#unknown_#x"), Err(ProtocolError::UnknownCommand(_))));
        assert!(matches!(Command::decode("#order_by#"), Err(ProtocolError::UnknownCommand(_))));
        assert!(matches!(Command::decode("short"), Err(ProtocolError::UnknownCommand(_))));
        assert_eq!(
            Command::decode("#filterby#status"),
            Err(ProtocolError::MissingSeparator("status".into()))
        );
    }

    #[test]
    fn test_encode_wire_format() {
        assert_eq!(Command::Select(3).encode("find"), "find3");
        assert_eq!(Command::NextPage.encode("list"), "listnext_page");
        assert_eq!(Command::ToggleControls.encode("list"), "listtoggle_filters");
        assert_eq!(Command::OrderBy("size".into()).encode("find"), "find#order_by#size");
        assert_eq!(
            Command::FilterBy {
                attribute: "status".into(),
                value: "seeding".into()
            }
            .encode("list"),
            "list#filterby#status/seeding"
        );
        assert_eq!(Command::Action("delete".into()).encode("list"), "list#action__#delete");
    }
}
