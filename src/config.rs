//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_SIZE: usize = 10;

pub const ENV_API_URL: &str = "FOUNDATION_API_URL";
pub const ENV_IMAGE_URL: &str = "FOUNDATION_IMAGE_URL";
pub const ENV_TIMEOUT_SECS: &str = "FOUNDATION_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} '{value}': {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid {field} '{value}': expected a positive integer")]
    InvalidNumber { field: &'static str, value: String },
}

/// User configuration for the TUI
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TuiConfig {
    /// Backend API root, e.g. `https://example.org/api/`
    pub api_base_url: Option<String>,
    /// Origin serving uploaded images; defaults to the API origin
    pub image_base_url: Option<String>,
    /// HTTP timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Rows per page in admin lists
    pub page_size: Option<usize>,
}

/// Fully resolved settings the client and UI run with
#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub api_base_url: Url,
    pub image_base_url: String,
    pub timeout_secs: u64,
    pub page_size: usize,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "foundation", "foundation-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Resolve against the process environment
    pub fn resolve(&self) -> Result<ApiSettings, ConfigError> {
        self.resolve_with(|key| std::env::var(key).ok())
    }

    /// Environment values win over the file, the file over defaults
    pub fn resolve_with(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ApiSettings, ConfigError> {
        let api_raw = env(ENV_API_URL)
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_base_url = parse_base_url("api_base_url", &api_raw)?;

        let image_base_url = match env(ENV_IMAGE_URL).or_else(|| self.image_base_url.clone()) {
            Some(raw) => {
                parse_base_url("image_base_url", &raw)?;
                raw.trim_end_matches('/').to_string()
            }
            None => api_base_url.origin().ascii_serialization(),
        };

        let timeout_secs = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::InvalidNumber {
                    field: "timeout_secs",
                    value: raw,
                })?,
            None => self
                .timeout_secs
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        Ok(ApiSettings {
            api_base_url,
            image_base_url,
            timeout_secs,
            page_size: self
                .page_size
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}

/// Parse a base URL, making sure relative joins stay under its path
fn parse_base_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: raw.to_string(),
        source,
    })
}
