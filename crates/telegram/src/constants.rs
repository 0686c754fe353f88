//! Constants used throughout the telegram bot

/// Telegram rejects callback data longer than this
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Callback-data prefixes of the list kinds; the chat id and ':' follow
pub mod prefix {
    pub const DOWNLOADS: &str = "list";
    pub const TORRSERVER: &str = "torrserver";
    pub const SEARCH: &str = "find";
}

/// Main menu callbacks
pub mod menu {
    pub const DOWNLOADS: &str = "cmd:downloads";
    pub const TORRSERVER: &str = "cmd:torrserver";
    pub const HELP: &str = "cmd:help";
}

/// Emoji constants for consistent UI
pub mod emoji {
    pub const SEARCH: &str = "🔎";
    pub const FOLDER: &str = "📁";
    pub const FILE: &str = "📄";
    pub const VIDEO: &str = "🎬";
    pub const AUDIO: &str = "🎧";
    pub const SERVER: &str = "📺";
    pub const WAIT: &str = "⏳";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_kinds_are_distinct() {
        let kinds = [prefix::DOWNLOADS, prefix::TORRSERVER, prefix::SEARCH];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert!(!a.starts_with(b) && !b.starts_with(a), "{} / {}", a, b);
            }
        }
        assert_eq!(menu::DOWNLOADS, "cmd:downloads");
    }
}
