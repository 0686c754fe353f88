use std::fmt;

/// Custom error type for telegram bot operations
#[derive(Debug)]
pub enum BotError {
    /// Telegram API error
    TelegramError(teloxide::RequestError),
    /// Backend client error
    Backend(torrent::ApiError),
    /// Generic error with message
    Message(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::TelegramError(e) => write!(f, "Telegram error: {}", e),
            BotError::Backend(e) => write!(f, "{}", e),
            BotError::Message(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for BotError {}

impl From<teloxide::RequestError> for BotError {
    fn from(err: teloxide::RequestError) -> Self {
        BotError::TelegramError(err)
    }
}

impl From<torrent::ApiError> for BotError {
    fn from(err: torrent::ApiError) -> Self {
        BotError::Backend(err)
    }
}

/// Result type alias for bot operations
pub type BotResult<T> = Result<T, BotError>;
