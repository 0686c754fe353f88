//! Commands that open a paginated list

use crate::constants::emoji;
use crate::handlers;
use crate::types::{HandlerResult, Services};
use paginator::ChatRef;
use teloxide::prelude::*;

/// Shortest query sent to the indexers
const MIN_QUERY_LEN: usize = 2;

pub async fn downloads(bot: Bot, msg: Message, services: Services) -> HandlerResult {
    handlers::open_downloads(bot, ChatRef(msg.chat.id.0), &services);
    Ok(())
}

pub async fn torrserver(bot: Bot, msg: Message, services: Services) -> HandlerResult {
    handlers::open_torrserver(bot, ChatRef(msg.chat.id.0), &services);
    Ok(())
}

/// Normalized search query, or None when the text cannot be one
pub fn search_query(text: &str) -> Option<&str> {
    let query = text.trim();
    if query.starts_with('/') || query.chars().count() < MIN_QUERY_LEN {
        return None;
    }
    Some(query)
}

/// Plain text is a search query
pub async fn search(bot: Bot, msg: Message, services: Services) -> HandlerResult {
    let Some(query) = msg.text().and_then(search_query) else {
        bot.send_message(
            msg.chat.id,
            format!("{} Send at least {} characters to search.", emoji::SEARCH, MIN_QUERY_LEN),
        )
        .await?;
        return Ok(());
    };

    tracing::info!("Search in chat {}: {:?}", msg.chat.id, query);
    handlers::open_search(bot, ChatRef(msg.chat.id.0), &services, query);
    Ok(())
}
