//! Indexer search results

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use paginator::{ActionOutcome, DataSource, Direction, ItemSemantics, SortHeader, SourceError};
use torrent::{torrent_file_info_hash, JackettApi, Release, TorrServerApi, TorrentApi};

use super::source_error;
use crate::utils::{escape_html, format_bytes, sanitize_file_name};

pub const TRACKER: &str = "tracker";

const DOWNLOAD: &str = "download";
const TORRSERVER: &str = "torrserver";
const TORRENT_FILE: &str = ".torrent";
const WEB_PAGE: &str = "web page";

/// A release plus where it already lives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchItem {
    pub release: Release,
    pub in_downloads: bool,
    pub in_server: bool,
}

/// Info hashes present in qBittorrent and TorrServer at the last reload
#[derive(Debug, Default)]
struct KnownHashes {
    downloads: HashSet<String>,
    server: HashSet<String>,
}

impl KnownHashes {
    fn mark(&self, item: &mut SearchItem) {
        if let Some(hash) = item.release.info_hash.as_deref() {
            item.in_downloads |= self.downloads.contains(hash);
            item.in_server |= self.server.contains(hash);
        }
    }
}

pub struct SearchList {
    query: String,
    torrent: TorrentApi,
    jackett: JackettApi,
    torrserver: TorrServerApi,
    known: Mutex<KnownHashes>,
}

impl SearchList {
    pub fn new(query: impl Into<String>, torrent: TorrentApi, jackett: JackettApi, torrserver: TorrServerApi) -> Self {
        Self {
            query: query.into(),
            torrent,
            jackett,
            torrserver,
            known: Mutex::new(KnownHashes::default()),
        }
    }

    /// Biggest and best seeded first
    pub fn sort_headers() -> Vec<SortHeader> {
        vec![
            SortHeader::new("size", "size", Direction::Descending),
            SortHeader::new("seeds", "seeds", Direction::Descending),
            SortHeader::new("peers", "peers", Direction::Unsorted),
            SortHeader::new("link", "link", Direction::Unsorted),
        ]
    }

    pub fn filter_attributes() -> [&'static str; 1] {
        [TRACKER]
    }

    fn known(&self) -> MutexGuard<'_, KnownHashes> {
        self.known.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn download_hashes(&self) -> HashSet<String> {
        match self.torrent.list_downloads().await {
            Ok(items) => items.into_iter().map(|i| i.hash).collect(),
            Err(e) => {
                tracing::warn!("Could not list downloads for search marks: {}", e);
                HashSet::new()
            }
        }
    }

    async fn server_hashes(&self) -> HashSet<String> {
        match self.torrserver.list().await {
            Ok(items) => items.into_iter().map(|i| i.hash).collect(),
            Err(e) => {
                tracing::warn!("Could not list TorrServer for search marks: {}", e);
                HashSet::new()
            }
        }
    }

    fn link(item: &SearchItem) -> Result<String, SourceError> {
        item.release
            .source_link()
            .map(str::to_string)
            .ok_or_else(|| SourceError::backend("release has no link"))
    }
}

#[async_trait]
impl ItemSemantics for SearchList {
    type Item = SearchItem;

    fn stringify(&self, item: &SearchItem, attribute: &str) -> String {
        match attribute {
            TRACKER => item.release.tracker.clone(),
            _ => String::new(),
        }
    }

    fn less_than(&self, a: &SearchItem, b: &SearchItem, key: &str) -> bool {
        match key {
            "size" => a.release.size < b.release.size,
            "seeds" => a.release.seeders < b.release.seeders,
            "peers" => a.release.peers < b.release.peers,
            "link" => a.release.link.is_none() && b.release.link.is_some(),
            _ => false,
        }
    }

    fn render_line(&self, item: &SearchItem, _selected: bool) -> String {
        let release = &item.release;
        let mut line = format!(
            "{} [{}] [{}] [{}s/{}p]",
            escape_html(&release.title),
            format_bytes(release.size),
            escape_html(&release.tracker),
            release.seeders,
            release.peers
        );
        if item.in_downloads {
            line.push_str(" [->downloads]");
        }
        if item.in_server {
            line.push_str(" [->torrserver]");
        }
        if release.link.is_some() {
            line.push_str(" [L:]");
        }
        line
    }

    fn actions(&self, item: &SearchItem) -> Vec<String> {
        let release = &item.release;
        let has_source = release.source_link().is_some();
        let mut actions = Vec::new();
        if has_source && !item.in_downloads {
            actions.push(DOWNLOAD.to_string());
        }
        if has_source && !item.in_server {
            actions.push(TORRSERVER.to_string());
        }
        if release.link.is_some() {
            actions.push(TORRENT_FILE.to_string());
        }
        if release.details.is_some() {
            actions.push(WEB_PAGE.to_string());
        }
        actions
    }

    async fn execute(&self, item: &mut SearchItem, action: &str) -> Result<ActionOutcome, SourceError> {
        match action {
            DOWNLOAD => {
                let link = Self::link(item)?;
                self.torrent.add(&link).await.map_err(source_error)?;
                item.in_downloads = true;
                Ok(ActionOutcome::Keep)
            }
            TORRSERVER => {
                let link = Self::link(item)?;
                self.torrserver
                    .add(&link, &item.release.title, item.release.poster.as_deref())
                    .await
                    .map_err(source_error)?;
                item.in_server = true;
                Ok(ActionOutcome::Keep)
            }
            TORRENT_FILE => {
                let link = item
                    .release
                    .link
                    .clone()
                    .ok_or_else(|| SourceError::backend("release has no .torrent link"))?;
                let bytes = self.jackett.fetch(&link).await.map_err(source_error)?;
                if item.release.info_hash.is_none() {
                    item.release.info_hash = torrent_file_info_hash(&bytes);
                    self.known().mark(item);
                }
                Ok(ActionOutcome::Document {
                    file_name: format!("{}.torrent", sanitize_file_name(&item.release.title)),
                    bytes,
                })
            }
            WEB_PAGE => match item.release.details.as_deref() {
                Some(details) => Ok(ActionOutcome::Reply(escape_html(details))),
                None => Ok(ActionOutcome::Deselect),
            },
            _ => Ok(ActionOutcome::Deselect),
        }
    }
}

#[async_trait]
impl DataSource for SearchList {
    async fn reload(&self) -> Result<Vec<SearchItem>, SourceError> {
        let (releases, downloads, server) = tokio::join!(
            self.jackett.search(&self.query),
            self.download_hashes(),
            self.server_hashes()
        );
        let releases = releases.map_err(source_error)?;

        let mut known = self.known();
        *known = KnownHashes { downloads, server };
        Ok(releases
            .into_iter()
            .map(|release| {
                let mut item = SearchItem {
                    release,
                    ..SearchItem::default()
                };
                known.mark(&mut item);
                item
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> SearchList {
        SearchList::new(
            "big buck bunny",
            TorrentApi::new("http://127.0.0.1:8080", "admin", "secret"),
            JackettApi::new("http://127.0.0.1:9117", "key", vec![]).unwrap(),
            TorrServerApi::new("http://127.0.0.1:8090").unwrap(),
        )
    }

    fn item(title: &str) -> SearchItem {
        SearchItem {
            release: Release {
                title: title.to_string(),
                tracker: "rutor".to_string(),
                link: Some("http://jackett/dl/1".to_string()),
                magnet: None,
                details: Some("https://rutor.info/torrent/1?a=1&b=2".to_string()),
                poster: None,
                info_hash: Some("abc".to_string()),
                size: 1024,
                seeders: 12,
                peers: 3,
            },
            in_downloads: false,
            in_server: false,
        }
    }

    #[test]
    fn test_render_line_with_marks() {
        let list = list();
        let mut hit = item("Big Buck Bunny");
        assert_eq!(
            list.render_line(&hit, false),
            "Big Buck Bunny [1.00 KB] [rutor] [12s/3p] [L:]"
        );

        hit.in_downloads = true;
        hit.in_server = true;
        hit.release.link = None;
        assert_eq!(
            list.render_line(&hit, false),
            "Big Buck Bunny [1.00 KB] [rutor] [12s/3p] [->downloads] [->torrserver]"
        );
    }

    #[test]
    fn test_actions_hide_done_targets() {
        let list = list();
        let mut hit = item("x");
        assert_eq!(list.actions(&hit), vec!["download", "torrserver", ".torrent", "web page"]);

        hit.in_downloads = true;
        hit.release.details = None;
        assert_eq!(list.actions(&hit), vec!["torrserver", ".torrent"]);

        hit.release.link = None;
        assert!(list.actions(&hit).is_empty());
    }

    #[test]
    fn test_link_sorts_missing_first() {
        let list = list();
        let with_link = item("a");
        let mut without = item("b");
        without.release.link = None;
        assert!(list.less_than(&without, &with_link, "link"));
        assert!(!list.less_than(&with_link, &without, "link"));
        assert_eq!(list.stringify(&with_link, TRACKER), "rutor");
    }

    #[test]
    fn test_known_hashes_mark_items() {
        let known = KnownHashes {
            downloads: ["abc".to_string()].into_iter().collect(),
            server: HashSet::new(),
        };
        let mut hit = item("x");
        known.mark(&mut hit);
        assert!(hit.in_downloads);
        assert!(!hit.in_server);

        let mut unknown = item("y");
        unknown.release.info_hash = None;
        known.mark(&mut unknown);
        assert!(!unknown.in_downloads);
    }

    #[tokio::test]
    async fn test_web_page_reply_is_escaped() {
        let list = list();
        let mut hit = item("x");
        let outcome = list.execute(&mut hit, WEB_PAGE).await.unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Reply("https://rutor.info/torrent/1?a=1&amp;b=2".to_string())
        );
    }
}
