//! Torrents held by TorrServer

use async_trait::async_trait;
use paginator::{ActionOutcome, DataSource, Direction, ItemSemantics, SortHeader, SourceError};
use torrent::{ServerItem, TorrServerApi};

use super::source_error;
use crate::constants::emoji;
use crate::utils::{escape_html, format_bytes};

pub struct TorrServerList {
    torrserver: TorrServerApi,
}

impl TorrServerList {
    pub fn new(torrserver: TorrServerApi) -> Self {
        Self { torrserver }
    }

    pub fn sort_headers() -> Vec<SortHeader> {
        vec![SortHeader::new("size", "size", Direction::Descending)]
    }
}

#[async_trait]
impl ItemSemantics for TorrServerList {
    type Item = ServerItem;

    fn stringify(&self, _item: &ServerItem, _attribute: &str) -> String {
        String::new()
    }

    fn less_than(&self, a: &ServerItem, b: &ServerItem, key: &str) -> bool {
        match key {
            "size" => a.size < b.size,
            _ => false,
        }
    }

    fn render_line(&self, item: &ServerItem, _selected: bool) -> String {
        format!(
            "{} {} [{}]",
            emoji::SERVER,
            escape_html(&item.title),
            format_bytes(item.size)
        )
    }

    fn actions(&self, _item: &ServerItem) -> Vec<String> {
        vec!["delete".to_string()]
    }

    async fn execute(&self, item: &mut ServerItem, action: &str) -> Result<ActionOutcome, SourceError> {
        match action {
            "delete" => {
                self.torrserver.remove(&item.hash).await.map_err(source_error)?;
                Ok(ActionOutcome::Reload)
            }
            _ => Ok(ActionOutcome::Deselect),
        }
    }
}

#[async_trait]
impl DataSource for TorrServerList {
    async fn reload(&self) -> Result<Vec<ServerItem>, SourceError> {
        self.torrserver.list().await.map_err(source_error)
    }
}
