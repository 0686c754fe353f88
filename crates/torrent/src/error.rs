use std::fmt;

/// Errors from the download manager, indexer and playback server clients
#[derive(Debug)]
pub enum ApiError {
    /// qBittorrent Web API error
    Qbit(qbit_rs::Error),
    /// Transport or decoding error
    Http(reqwest::Error),
    /// A link that cannot be handed to a backend
    InvalidUrl(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Qbit(e) => write!(f, "qBittorrent error: {}", e),
            ApiError::Http(e) => match e.status() {
                Some(status) => write!(f, "request error: {}", status),
                None => write!(f, "request error: {}", e),
            },
            ApiError::InvalidUrl(url) => write!(f, "invalid link: {}", url),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<qbit_rs::Error> for ApiError {
    fn from(err: qbit_rs::Error) -> Self {
        ApiError::Qbit(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Http(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
