//! Backend clients for the bot
//!
//! qBittorrent (through qbit-rs) for downloads, Jackett for indexer search
//! and TorrServer for streaming playback.

pub mod error;
pub mod jackett;
pub mod torrent;
pub mod torrserver;
pub mod utils;

pub use error::{ApiError, ApiResult};
pub use jackett::{JackettApi, Release, MAX_TRACKER_LEN};
pub use torrent::{DownloadItem, TorrentApi};
pub use torrserver::{ServerItem, TorrServerApi};
pub use utils::{dominant_extension, extract_info_hash, torrent_file_info_hash};
