//! Callback query handlers for inline keyboard interactions
//!
//! List buttons go straight to the session registry; only taps nobody
//! claims are answered here.

use crate::constants::{emoji, menu, MAX_CALLBACK_DATA_LEN};
use crate::handlers;
use crate::types::{HandlerResult, Services};
use paginator::{ChatRef, Dispatch};
use teloxide::prelude::*;

const EXPIRED: &str = "This list is no longer active, open it again";
const BUSY: &str = "The list is busy or closing, try again";

/// Handle all callback queries from inline keyboards
pub async fn handle_callback(bot: Bot, q: CallbackQuery, services: Services) -> HandlerResult {
    let Some(data) = q.data.as_deref() else {
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    };

    if data.len() > MAX_CALLBACK_DATA_LEN {
        tracing::warn!("Callback data too long: {} bytes", data.len());
        bot.answer_callback_query(&q.id).await?;
        return Ok(());
    }

    match services.registry.dispatch(&q.id, data) {
        // The session acknowledges the tap itself
        Dispatch::Routed => return Ok(()),
        Dispatch::Dropped => {
            bot.answer_callback_query(&q.id)
                .text(format!("{} {}", emoji::WAIT, BUSY))
                .await?;
            return Ok(());
        }
        Dispatch::Unrouted => {}
    }

    if handlers::is_list_data(data) {
        tracing::debug!("Tap on an inactive list: {}", data);
        bot.answer_callback_query(&q.id).text(EXPIRED).await?;
        return Ok(());
    }

    bot.answer_callback_query(&q.id).await?;

    let Some(message) = q.message else {
        return Ok(());
    };
    let chat = ChatRef(message.chat.id.0);

    match data {
        menu::DOWNLOADS => {
            handlers::open_downloads(bot, chat, &services);
        }
        menu::TORRSERVER => {
            handlers::open_torrserver(bot, chat, &services);
        }
        menu::HELP => {
            crate::commands::send_help(&bot, message.chat.id).await?;
        }
        _ => {
            tracing::warn!("Unknown callback data: {}", data);
        }
    }

    Ok(())
}
