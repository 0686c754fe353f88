//! Opening lists in a chat
//!
//! Each list kind gets one active session per chat. Opening a list again
//! supersedes the previous session of that kind. Every session gets a fresh
//! callback prefix, so the old message stays in the chat but its buttons
//! only get the "expired" answer.

use std::sync::Arc;

use paginator::{ChatRef, Paginator, SessionHandle};
use teloxide::prelude::*;

use crate::constants::prefix;
use crate::delivery::TelegramDelivery;
use crate::lists::{list_scope, DownloadsList, SearchList, TorrServerList};
use crate::types::Services;

fn delivery(bot: Bot) -> Arc<TelegramDelivery> {
    Arc::new(TelegramDelivery::new(bot))
}

/// Downloads list, reloaded in the background
pub fn open_downloads(bot: Bot, chat: ChatRef, services: &Services) -> SessionHandle {
    let semantics = Arc::new(DownloadsList::new(services.torrent.clone()));
    let paginator = Paginator::new(
        services.registry.unique_prefix(prefix::DOWNLOADS),
        services.config.items_per_page,
        semantics,
    )
    .with_sorting(DownloadsList::sort_headers())
    .with_filtering(DownloadsList::filter_attributes());

    let scope = list_scope(prefix::DOWNLOADS, chat.0);
    services
        .registry
        .launch(&scope, paginator, delivery(bot), chat, services.config.session(true))
}

pub fn open_torrserver(bot: Bot, chat: ChatRef, services: &Services) -> SessionHandle {
    let semantics = Arc::new(TorrServerList::new(services.torrserver.clone()));
    let paginator = Paginator::new(
        services.registry.unique_prefix(prefix::TORRSERVER),
        services.config.items_per_page,
        semantics,
    )
    .with_sorting(TorrServerList::sort_headers());

    let scope = list_scope(prefix::TORRSERVER, chat.0);
    services
        .registry
        .launch(&scope, paginator, delivery(bot), chat, services.config.session(false))
}

/// Search results for `query`
pub fn open_search(bot: Bot, chat: ChatRef, services: &Services, query: &str) -> SessionHandle {
    let semantics = Arc::new(SearchList::new(
        query,
        services.torrent.clone(),
        services.jackett.clone(),
        services.torrserver.clone(),
    ));
    let paginator = Paginator::new(
        services.registry.unique_prefix(prefix::SEARCH),
        services.config.items_per_page,
        semantics,
    )
    .with_sorting(SearchList::sort_headers())
    .with_filtering(SearchList::filter_attributes());

    let scope = list_scope(prefix::SEARCH, chat.0);
    services
        .registry
        .launch(&scope, paginator, delivery(bot), chat, services.config.session(false))
}

/// Whether callback data belongs to one of the list kinds
pub fn is_list_data(data: &str) -> bool {
    [prefix::DOWNLOADS, prefix::TORRSERVER, prefix::SEARCH]
        .iter()
        .any(|kind| data.starts_with(kind))
}
