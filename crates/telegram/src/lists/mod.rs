//! The three lists the bot shows: downloads, TorrServer and search results

pub mod downloads;
pub mod search;
pub mod torrserver;

pub use downloads::DownloadsList;
pub use search::{SearchItem, SearchList};
pub use torrserver::TorrServerList;

use paginator::SourceError;

/// Map a backend failure into the error a list reports
pub(crate) fn source_error(err: torrent::ApiError) -> SourceError {
    SourceError::backend(err)
}

/// The logical list a session shows: one kind in one chat
pub fn list_scope(kind: &str, chat_id: i64) -> String {
    format!("{}{}", kind, chat_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_scope() {
        assert_eq!(list_scope("find", -1001234), "find-1001234");
        assert_eq!(list_scope("list", 42), "list42");
    }
}
