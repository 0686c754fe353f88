//! Telegram front end: commands, list sessions and callback routing

pub mod access;
pub mod callbacks;
pub mod commands;
pub mod constants;
pub mod delivery;
pub mod error;
pub mod handlers;
pub mod keyboards;
pub mod lists;
pub mod telegram;
pub mod types;
pub mod utils;

pub use access::AccessList;
pub use delivery::TelegramDelivery;
pub use error::{BotError, BotResult};
pub use teloxide::prelude::Dispatcher;
pub use types::{Command, HandlerResult, ListConfig, Services};
