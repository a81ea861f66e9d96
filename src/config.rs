//! Cache and client configuration.
//!
//! All fields have serde defaults, so a partial (or empty) JSON document
//! yields a working configuration against the production endpoint.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Production endpoint for forecast data.
const DEFAULT_BASE_URL: &str = "https://api.weather.gov";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// api.weather.gov requires an identifying User-Agent.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Path of the bundled zone feed. A missing file is an empty feed.
    #[serde(default = "default_zone_feed")]
    pub zone_feed: PathBuf,

    /// Zone list expiration in seconds.
    #[serde(default = "default_zones_ttl")]
    pub zones_ttl_secs: u64,

    /// Per-zone forecast expiration in seconds.
    #[serde(default = "default_forecast_ttl")]
    pub forecast_ttl_secs: u64,
}

impl CacheConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

// ── Defaults ──────────────────────────────────────────────────────────

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("zonecache/{} (zonecache@example.com)", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_zone_feed() -> PathBuf {
    PathBuf::from("zones.json")
}

fn default_zones_ttl() -> u64 {
    3600
}

fn default_forecast_ttl() -> u64 {
    900
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            zone_feed: default_zone_feed(),
            zones_ttl_secs: default_zones_ttl(),
            forecast_ttl_secs: default_forecast_ttl(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: CacheConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.zones_ttl_secs, 3600);
        assert_eq!(config.forecast_ttl_secs, 900);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_partial_document_overrides() {
        let config: CacheConfig = serde_json::from_str(
            r#"{"forecast_ttl_secs": 60, "zone_feed": "/data/zones.json"}"#,
        )
        .unwrap();
        assert_eq!(config.forecast_ttl_secs, 60);
        assert_eq!(config.zone_feed, PathBuf::from("/data/zones.json"));
        assert_eq!(config.zones_ttl_secs, 3600);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(CacheConfig::load(Path::new("/nonexistent/config.json")).is_err());
    }
}
