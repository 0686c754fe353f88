//! Command handlers for the Telegram bot
//!
//! - `basic`: start, help, menu and the fallback reply
//! - `lists`: downloads, TorrServer and search lists

mod basic;
mod lists;

pub use basic::*;
pub use lists::*;
