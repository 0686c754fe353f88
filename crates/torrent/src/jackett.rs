//! Jackett indexer search

use reqwest::Client;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::utils::extract_info_hash;

/// Tracker names become filter values inside 64-byte callback data
pub const MAX_TRACKER_LEN: usize = 24;

/// One search hit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Release {
    pub title: String,
    pub tracker: String,
    /// Link to a downloadable .torrent file
    pub link: Option<String>,
    pub magnet: Option<String>,
    /// Tracker web page of the release
    pub details: Option<String>,
    pub poster: Option<String>,
    /// Lowercase info hash, when the indexer knows it
    pub info_hash: Option<String>,
    pub size: u64,
    pub seeders: u64,
    pub peers: u64,
}

impl Release {
    /// Link handed to a torrent client: the .torrent URL first, then the magnet
    pub fn source_link(&self) -> Option<&str> {
        self.link.as_deref().or(self.magnet.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct QueryResults {
    #[serde(default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawResult {
    title: Option<String>,
    tracker: Option<String>,
    tracker_id: Option<String>,
    link: Option<String>,
    magnet_uri: Option<String>,
    details: Option<String>,
    poster: Option<String>,
    info_hash: Option<String>,
    size: Option<u64>,
    seeders: Option<u64>,
    peers: Option<u64>,
}

/// Longest prefix of `text` that fits in `max` bytes
fn truncate_bytes(text: &str, max: usize) -> String {
    let mut end = 0;
    for (i, c) in text.char_indices() {
        if i + c.len_utf8() > max {
            break;
        }
        end = i + c.len_utf8();
    }
    text[..end].to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<RawResult> for Release {
    fn from(raw: RawResult) -> Self {
        let magnet = non_empty(raw.magnet_uri);
        let info_hash = non_empty(raw.info_hash)
            .map(|h| h.to_lowercase())
            .or_else(|| magnet.as_deref().and_then(extract_info_hash));
        let tracker = non_empty(raw.tracker_id)
            .or(non_empty(raw.tracker))
            .unwrap_or_else(|| "unknown".to_string());

        Release {
            title: raw.title.unwrap_or_default(),
            // '/' separates attribute and value in callback data
            tracker: truncate_bytes(&tracker.replace('/', "_"), MAX_TRACKER_LEN),
            link: non_empty(raw.link),
            magnet,
            details: non_empty(raw.details),
            poster: non_empty(raw.poster),
            info_hash,
            size: raw.size.unwrap_or(0),
            seeders: raw.seeders.unwrap_or(0),
            peers: raw.peers.unwrap_or(0),
        }
    }
}

#[derive(Clone)]
pub struct JackettApi {
    client: Client,
    base_url: String,
    api_key: String,
    indexers: Vec<String>,
}

impl JackettApi {
    pub fn new(host: &str, api_key: &str, indexers: Vec<String>) -> ApiResult<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            client,
            base_url: host.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            indexers,
        })
    }

    fn results_url(&self) -> String {
        format!(
            "{}/api/v2.0/indexers/status:healthy,test:passed/results",
            self.base_url
        )
    }

    fn query_params<'a>(&'a self, query: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("apikey", self.api_key.as_str())];
        params.extend(self.indexers.iter().map(|i| ("Tracker[]", i.as_str())));
        params.push(("Query", query));
        params
    }

    pub async fn search(&self, query: &str) -> ApiResult<Vec<Release>> {
        tracing::info!("Searching indexers for {:?}", query);
        let response = self
            .client
            .get(self.results_url())
            .query(&self.query_params(query))
            .send()
            .await?
            .error_for_status()?;
        let results: QueryResults = response.json().await?;
        tracing::debug!("Indexers returned {} results", results.results.len());
        Ok(results.results.into_iter().map(Release::from).collect())
    }

    /// Download a .torrent file
    pub async fn fetch(&self, link: &str) -> ApiResult<Vec<u8>> {
        if !link.starts_with("http://") && !link.starts_with("https://") {
            return Err(ApiError::InvalidUrl(link.to_string()));
        }
        let bytes = self
            .client
            .get(link)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}
