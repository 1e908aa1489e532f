//! Client configuration.
//!
//! Values come either from a deserialized document (any serde format) or from
//! the `THEHIVE_*` environment variables.

use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Cases requested per page. Zero or negative disables paging.
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Read `THEHIVE_URL` (required), `THEHIVE_PAGE_SIZE` and
    /// `THEHIVE_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = lookup("THEHIVE_URL")
            .ok_or_else(|| ApiError::InvalidRequest("THEHIVE_URL is not set".to_string()))?;
        let mut config = Self::new(&base_url);

        if let Some(raw) = lookup("THEHIVE_PAGE_SIZE") {
            config.page_size = raw.trim().parse().map_err(|_| {
                ApiError::InvalidRequest(format!("THEHIVE_PAGE_SIZE is not an integer: {raw}"))
            })?;
        }
        if let Some(raw) = lookup("THEHIVE_TIMEOUT_MS") {
            config.timeout_ms = raw.trim().parse().map_err(|_| {
                ApiError::InvalidRequest(format!("THEHIVE_TIMEOUT_MS is not an integer: {raw}"))
            })?;
        }
        Ok(config)
    }
}
