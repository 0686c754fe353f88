use std::fmt;
use std::time::Duration;

/// Failure of a data source reload or an item action
#[derive(Debug)]
pub enum SourceError {
    /// The call did not complete within the session's call timeout
    Timeout(Duration),
    /// The backend reported an error
    Backend(String),
    /// The action went through but reloading the list afterwards failed
    Refresh(Box<SourceError>),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Timeout(limit) => write!(f, "request timed out after {}s", limit.as_secs()),
            SourceError::Backend(msg) => write!(f, "{}", msg),
            SourceError::Refresh(cause) => write!(f, "done, but the list could not be refreshed: {}", cause),
        }
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    pub fn backend(err: impl fmt::Display) -> Self {
        SourceError::Backend(err.to_string())
    }
}

/// Failure to send or edit a chat message
#[derive(Debug)]
pub enum DeliveryError {
    /// The delivery channel rejected the request
    Request(String),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Request(msg) => write!(f, "delivery failed: {}", msg),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Malformed callback payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    Empty,
    BadIndex(String),
    UnknownCommand(String),
    MissingSeparator(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Empty => write!(f, "empty callback payload"),
            ProtocolError::BadIndex(raw) => write!(f, "invalid item index: {}", raw),
            ProtocolError::UnknownCommand(raw) => write!(f, "unknown command: {}", raw),
            ProtocolError::MissingSeparator(raw) => write!(f, "filter payload without '/': {}", raw),
        }
    }
}

impl std::error::Error for ProtocolError {}
