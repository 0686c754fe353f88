use std::sync::Arc;
use std::time::Duration;

use paginator::{SessionConfig, SessionRegistry};
use teloxide::macros::BotCommands;
use torrent::{JackettApi, TorrServerApi, TorrentApi};

/// Type alias for handler result types
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported (any other text is a search query):"
)]
pub enum Command {
    #[command(description = "Start the bot")]
    Start,
    #[command(description = "Display help information")]
    Help,
    #[command(description = "Show the main menu")]
    Menu,
    #[command(description = "Downloads")]
    Downloads,
    #[command(description = "Torrserver")]
    Torrserver,
}

/// Paging and timing shared by every list the bot shows
#[derive(Debug, Clone, PartialEq)]
pub struct ListConfig {
    pub items_per_page: usize,
    /// Background reload period of the downloads list
    pub refresh_every: Duration,
    pub call_timeout: Duration,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            items_per_page: 4,
            refresh_every: Duration::from_secs(5),
            call_timeout: Duration::from_secs(30),
        }
    }
}

impl ListConfig {
    pub fn session(&self, refresh: bool) -> SessionConfig {
        SessionConfig {
            refresh_every: refresh.then_some(self.refresh_every),
            call_timeout: self.call_timeout,
        }
    }
}

/// Backends, list settings and the session registry, injected into every handler
#[derive(Clone)]
pub struct Services {
    pub registry: Arc<SessionRegistry>,
    pub torrent: TorrentApi,
    pub jackett: JackettApi,
    pub torrserver: TorrServerApi,
    pub config: ListConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::utils::command::BotCommands;

    #[test]
    fn test_parse_commands() {
        assert!(matches!(Command::parse("/downloads", "bot"), Ok(Command::Downloads)));
        assert!(matches!(Command::parse("/torrserver", "bot"), Ok(Command::Torrserver)));
        assert!(Command::parse("big buck bunny", "bot").is_err());
    }

    #[test]
    fn test_session_config() {
        let config = ListConfig::default();
        assert_eq!(config.session(true).refresh_every, Some(Duration::from_secs(5)));
        assert_eq!(config.session(false).refresh_every, None);
        assert_eq!(config.session(false).call_timeout, Duration::from_secs(30));
    }
}
