//! TorrServer playback server client
//!
//! Everything goes through `POST /torrents` with an `action` field.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiResult;

/// A torrent registered on the playback server
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerItem {
    pub title: String,
    pub hash: String,
    #[serde(rename = "torrent_size")]
    pub size: u64,
    pub poster: Option<String>,
}

#[derive(Clone)]
pub struct TorrServerApi {
    client: Client,
    url: String,
}

impl TorrServerApi {
    pub fn new(host: &str) -> ApiResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: format!("{}/torrents", host.trim_end_matches('/')),
        })
    }

    async fn post(&self, body: serde_json::Value) -> ApiResult<reqwest::Response> {
        Ok(self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?)
    }

    pub async fn list(&self) -> ApiResult<Vec<ServerItem>> {
        let items: Vec<ServerItem> = self.post(json!({ "action": "list" })).await?.json().await?;
        tracing::debug!("TorrServer lists {} torrents", items.len());
        Ok(items
            .into_iter()
            .map(|mut item| {
                item.hash = item.hash.to_lowercase();
                item
            })
            .collect())
    }

    pub async fn add(&self, link: &str, title: &str, poster: Option<&str>) -> ApiResult<()> {
        tracing::info!("Adding {} to TorrServer", title);
        self.post(json!({
            "action": "add",
            "link": link,
            "title": title,
            "poster": poster.unwrap_or(""),
            "save_to_db": true,
        }))
        .await?;
        Ok(())
    }

    pub async fn remove(&self, hash: &str) -> ApiResult<()> {
        tracing::info!("Removing {} from TorrServer", hash);
        self.post(json!({ "action": "rem", "hash": hash })).await?;
        Ok(())
    }
}
