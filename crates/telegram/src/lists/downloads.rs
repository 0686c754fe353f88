//! qBittorrent downloads

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use paginator::{ActionOutcome, DataSource, Direction, ItemSemantics, SortHeader, SourceError};
use torrent::{DownloadItem, TorrentApi};

use super::source_error;
use crate::constants::emoji;
use crate::utils::{escape_html, file_icon, format_bytes};

pub const STATUS: &str = "status";

/// Space taken by all torrents and left on the download volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskUsage {
    pub used: u64,
    pub free: u64,
}

pub struct DownloadsList {
    torrent: TorrentApi,
    disk: Mutex<Option<DiskUsage>>,
}

impl DownloadsList {
    pub fn new(torrent: TorrentApi) -> Self {
        Self {
            torrent,
            disk: Mutex::new(None),
        }
    }

    fn disk(&self) -> MutexGuard<'_, Option<DiskUsage>> {
        self.disk.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Newest first by default
    pub fn sort_headers() -> Vec<SortHeader> {
        vec![
            SortHeader::new("date", "date", Direction::Descending),
            SortHeader::new("name", "name", Direction::Unsorted),
            SortHeader::new("size", "size", Direction::Unsorted),
            SortHeader::new("ratio", "ratio", Direction::Unsorted),
            SortHeader::new("dir", "dir", Direction::Unsorted),
        ]
    }

    pub fn filter_attributes() -> [&'static str; 1] {
        [STATUS]
    }
}

fn status_with_peers(item: &DownloadItem) -> String {
    match item.status.as_str() {
        "downloading" => format!("{}:{}p", item.status, item.seeds),
        "seeding" => format!("{}:{}p", item.status, item.peers),
        _ => item.status.clone(),
    }
}

#[async_trait]
impl ItemSemantics for DownloadsList {
    type Item = DownloadItem;

    fn stringify(&self, item: &DownloadItem, attribute: &str) -> String {
        match attribute {
            STATUS => item.status.clone(),
            _ => String::new(),
        }
    }

    fn less_than(&self, a: &DownloadItem, b: &DownloadItem, key: &str) -> bool {
        match key {
            "date" => a.added_on < b.added_on,
            "name" => a.name.to_lowercase() < b.name.to_lowercase(),
            "size" => a.size < b.size,
            "ratio" => a.ratio < b.ratio,
            "dir" => b.is_dir && !a.is_dir,
            _ => false,
        }
    }

    fn render_line(&self, item: &DownloadItem, selected: bool) -> String {
        let mut line = String::new();
        if item.is_dir {
            line.push_str(&format!("{}[{}x | {}]", emoji::FOLDER, item.ext_count, item.ext));
        }
        line.push_str(&format!(
            "{}{} [{}] [{:.0}%] [{:.2}x] [{}]",
            file_icon(&item.ext),
            escape_html(&item.name),
            format_bytes(item.size),
            item.progress * 100.0,
            item.ratio,
            status_with_peers(item),
        ));
        if selected {
            line.push_str(&format!("\n<code>{}</code>", item.hash));
        }
        line
    }

    fn actions(&self, item: &DownloadItem) -> Vec<String> {
        let mut actions = Vec::new();
        match item.status.as_str() {
            "downloading" | "seeding" => actions.push("pause".to_string()),
            "unknown" => {}
            _ => actions.push("start".to_string()),
        }
        actions.push("delete".to_string());
        actions
    }

    async fn execute(&self, item: &mut DownloadItem, action: &str) -> Result<ActionOutcome, SourceError> {
        match action {
            "pause" => {
                self.torrent.pause(&item.hash).await.map_err(source_error)?;
                Ok(ActionOutcome::Reload)
            }
            "start" => {
                self.torrent.resume(&item.hash).await.map_err(source_error)?;
                Ok(ActionOutcome::Reload)
            }
            "delete" => {
                self.torrent.delete(&item.hash).await.map_err(source_error)?;
                Ok(ActionOutcome::Remove)
            }
            _ => Ok(ActionOutcome::Deselect),
        }
    }

    fn footer(&self, visible: &[&DownloadItem]) -> Option<String> {
        let downloaded: u64 = visible.iter().map(|i| i.downloaded).sum();
        let uploaded: u64 = visible.iter().map(|i| i.uploaded).sum();
        let mut footer = format!("{} download / {} upload", format_bytes(downloaded), format_bytes(uploaded));
        if let Some(disk) = *self.disk() {
            footer.push_str(&format!(
                "\nvolume: {} used / {} free",
                format_bytes(disk.used),
                format_bytes(disk.free)
            ));
        }
        Some(footer)
    }
}

#[async_trait]
impl DataSource for DownloadsList {
    async fn reload(&self) -> Result<Vec<DownloadItem>, SourceError> {
        let (items, free) = tokio::join!(self.torrent.list_downloads(), self.torrent.free_space());
        let items = items.map_err(source_error)?;

        // The list still shows without disk figures when the server state is unavailable
        *self.disk() = match free {
            Ok(Some(free)) => Some(DiskUsage {
                used: items.iter().map(|i| i.size).sum(),
                free,
            }),
            Ok(None) | Err(_) => None,
        };
        Ok(items)
    }
}
