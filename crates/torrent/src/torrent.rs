use qbit_rs::{
    model::{AddTorrentArg, Credential, GetTorrentListArg, Torrent, TorrentSource},
    Qbit,
};
use reqwest::Url;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::utils::dominant_extension;

/// A torrent as shown in the downloads list
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadItem {
    pub hash: String,
    pub name: String,
    /// One of `downloading`, `seeding`, `paused`, `queued`, `checking`, `error`, `unknown`
    pub status: String,
    pub size: u64,
    pub downloaded: u64,
    pub uploaded: u64,
    /// 0.0 ..= 1.0
    pub progress: f64,
    pub ratio: f64,
    /// Unix timestamp
    pub added_on: i64,
    pub seeds: i64,
    pub peers: i64,
    /// Most common file extension, with the dot
    pub ext: String,
    /// Number of files carrying `ext`
    pub ext_count: usize,
    /// More than one file shares the dominant extension
    pub is_dir: bool,
}

impl DownloadItem {
    /// Fill the extension fields from the torrent's file names
    pub fn set_files<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        if let Some((ext, count)) = dominant_extension(names) {
            self.ext = ext;
            self.ext_count = count;
            self.is_dir = count > 1;
        }
    }
}

impl From<Torrent> for DownloadItem {
    fn from(torrent: Torrent) -> Self {
        let state = torrent
            .state
            .as_ref()
            .map(|s| format!("{:?}", s))
            .unwrap_or_default();

        let name = torrent.name.unwrap_or_default();
        let mut item = DownloadItem {
            hash: torrent.hash.unwrap_or_default().to_lowercase(),
            ext: String::new(),
            ext_count: 0,
            is_dir: false,
            name,
            status: status_word(&state).to_string(),
            size: torrent.size.unwrap_or(0).max(0) as u64,
            downloaded: torrent.downloaded.unwrap_or(0).max(0) as u64,
            uploaded: torrent.uploaded.unwrap_or(0).max(0) as u64,
            progress: torrent.progress.unwrap_or(0.0),
            ratio: torrent.ratio.unwrap_or(0.0).max(0.0),
            added_on: torrent.added_on.unwrap_or(0),
            seeds: torrent.num_seeds.unwrap_or(0),
            peers: torrent.num_leechs.unwrap_or(0),
        };
        // Until the file list is known the name is the best guess
        let name = item.name.clone();
        item.set_files([name.as_str()]);
        item
    }
}

/// Collapse qBittorrent's torrent states into the handful the bot filters on
pub fn status_word(state: &str) -> &'static str {
    match state {
        "Downloading" | "ForcedDL" | "MetaDL" | "StalledDL" | "Allocating" => "downloading",
        "Uploading" | "ForcedUP" | "StalledUP" => "seeding",
        "PausedDL" | "PausedUP" | "StoppedDL" | "StoppedUP" => "paused",
        "QueuedDL" | "QueuedUP" => "queued",
        "CheckingDL" | "CheckingUP" | "CheckingResumeData" | "Moving" => "checking",
        "Error" | "MissingFiles" => "error",
        _ => "unknown",
    }
}

/// Wrapper around qBittorrent API client
#[derive(Clone)]
pub struct TorrentApi {
    pub client: Arc<Qbit>,
}

impl TorrentApi {
    pub fn new(endpoint: &str, username: &str, password: &str) -> Self {
        let credential = Credential::new(username, password);
        let client = Arc::new(Qbit::new(endpoint, credential));
        TorrentApi { client }
    }

    /// Authenticate with the qBittorrent server
    ///
    /// # Errors
    /// Returns an error if authentication fails
    pub async fn login(&self) -> ApiResult<()> {
        self.client.login(false).await.map_err(|e| {
            tracing::error!("Failed to login to qBittorrent: {}", e);
            ApiError::from(e)
        })
    }

    pub async fn list_downloads(&self) -> ApiResult<Vec<DownloadItem>> {
        tracing::debug!("Querying torrents from qBittorrent");
        let arg = GetTorrentListArg {
            filter: None,
            category: None,
            tag: None,
            sort: None,
            reverse: None,
            limit: None,
            offset: None,
            hashes: None,
        };

        let torrents = match self.client.get_torrent_list(arg).await {
            Ok(torrents) => torrents,
            Err(err) => {
                tracing::error!("Error querying torrents: {}", err);
                return Err(err.into());
            }
        };

        let mut items: Vec<DownloadItem> = torrents.into_iter().map(DownloadItem::from).collect();
        for item in &mut items {
            match self.client.get_torrent_contents(&item.hash, None).await {
                Ok(files) => item.set_files(files.iter().map(|f| f.name.as_str())),
                Err(err) => tracing::debug!("No file list for {}: {}", item.hash, err),
            }
        }
        Ok(items)
    }

    /// Free space on the download volume as reported by qBittorrent
    pub async fn free_space(&self) -> ApiResult<Option<u64>> {
        let data = self.client.sync(None).await.map_err(|err| {
            tracing::warn!("Error querying server state: {}", err);
            ApiError::from(err)
        })?;
        Ok(data
            .server_state
            .and_then(|state| state.free_space_on_disk)
            .map(|free| free.max(0) as u64))
    }

    /// Add a magnet link or a .torrent URL
    pub async fn add(&self, link: &str) -> ApiResult<()> {
        tracing::info!("Adding torrent: {}", link);
        let url = Url::parse(link).map_err(|_| ApiError::InvalidUrl(link.to_string()))?;
        let arg = AddTorrentArg {
            source: TorrentSource::Urls {
                urls: vec![url].into(),
            },
            ..Default::default()
        };
        self.client.add_torrent(arg).await.map_err(|err| {
            tracing::error!("Error adding torrent: {}", err);
            ApiError::from(err)
        })
    }

    pub async fn pause(&self, hash: &str) -> ApiResult<()> {
        tracing::info!("Pausing torrent {}", hash);
        self.client
            .pause_torrents(vec![hash.to_string()])
            .await
            .map_err(ApiError::from)
    }

    pub async fn resume(&self, hash: &str) -> ApiResult<()> {
        tracing::info!("Resuming torrent {}", hash);
        self.client
            .resume_torrents(vec![hash.to_string()])
            .await
            .map_err(ApiError::from)
    }

    /// Remove a torrent together with its downloaded data
    pub async fn delete(&self, hash: &str) -> ApiResult<()> {
        tracing::info!("Deleting torrent {} with data", hash);
        self.client
            .delete_torrents(vec![hash.to_string()], true)
            .await
            .map_err(ApiError::from)
    }
}
