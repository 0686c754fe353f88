//! Environment configuration

use std::fmt;
use std::time::Duration;

use telegram::ListConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    Missing(&'static str),
    Invalid { name: &'static str, value: String },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Missing(name) => write!(f, "{} must be set in .env file", name),
            SettingsError::Invalid { name, value } => write!(f, "{} has an invalid value: {:?}", name, value),
        }
    }
}

impl std::error::Error for SettingsError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub qbit_host: String,
    pub qbit_username: String,
    pub qbit_password: String,
    pub jackett_host: String,
    pub jackett_api_key: String,
    pub jackett_indexers: Vec<String>,
    pub torrserver_host: String,
    pub allowed_users: Vec<u64>,
    pub lists: ListConfig,
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |name: &'static str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |name: &'static str| get(name).ok_or(SettingsError::Missing(name));
        let seconds = |name: &'static str, default: u64| -> Result<Duration, SettingsError> {
            match parse_or(name, get(name), default)? {
                0 => Err(SettingsError::Invalid {
                    name,
                    value: "0".to_string(),
                }),
                secs => Ok(Duration::from_secs(secs)),
            }
        };

        let defaults = ListConfig::default();
        let lists = ListConfig {
            items_per_page: parse_or("ITEMS_PER_PAGE", get("ITEMS_PER_PAGE"), defaults.items_per_page)?.max(1),
            refresh_every: seconds("REFRESH_SECONDS", defaults.refresh_every.as_secs())?,
            call_timeout: seconds("CALL_TIMEOUT_SECONDS", defaults.call_timeout.as_secs())?,
        };

        let allowed_users = split_list(get("ALLOWED_USERS"))
            .into_iter()
            .map(|id| {
                id.parse::<u64>().map_err(|_| SettingsError::Invalid {
                    name: "ALLOWED_USERS",
                    value: id,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Settings {
            qbit_host: required("QBIT_HOST")?,
            qbit_username: required("QBIT_USERNAME")?,
            qbit_password: required("QBIT_PASSWORD")?,
            jackett_host: required("JACKETT_HOST")?,
            jackett_api_key: required("JACKETT_API_KEY")?,
            jackett_indexers: split_list(get("JACKETT_INDEXERS")),
            torrserver_host: required("TORRSERVER_HOST")?,
            allowed_users,
            lists,
        })
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, SettingsError> {
    match value {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| SettingsError::Invalid { name, value }),
    }
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
