//! HTTP client for the National Weather Service API.
//!
//! This module provides the `NwsClient` struct for loading the bundled
//! zone feed from local disk and fetching per-zone forecast data from
//! `api.weather.gov`, converting wire payloads into the domain records
//! in [`crate::models`].

use std::collections::HashSet;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::models::{Forecast, ForecastResponse, Zone, ZoneFeed};

use super::ApiError;

/// Upstream data source the cache populates from.
///
/// Implemented by [`NwsClient`] for production and by in-memory mocks in
/// tests, so cache behavior can be verified with fetch-count assertions.
pub trait Upstream: Send + Sync + 'static {
    fn fetch_zones(&self) -> impl Future<Output = Result<Vec<Zone>, ApiError>> + Send;
    fn fetch_forecast(
        &self,
        zone_id: &str,
    ) -> impl Future<Output = Result<Vec<Forecast>, ApiError>> + Send;
}

/// Opt-in synthetic fault source for failure-handling demos: fails every
/// nth call across both fetch operations. Off unless explicitly attached
/// via [`NwsClient::with_fault_injector`].
#[derive(Debug)]
pub struct FaultInjector {
    every: u64,
    calls: AtomicU64,
}

impl FaultInjector {
    /// Fail every `n`th call. `n` must be at least 1.
    pub fn every(n: u64) -> Self {
        assert!(n > 0, "fault cadence must be at least 1");
        Self {
            every: n,
            calls: AtomicU64::new(0),
        }
    }

    fn should_fail(&self) -> bool {
        let call = self.calls.fetch_add(1, Ordering::Relaxed) + 1;
        call % self.every == 0
    }
}

/// API client for `api.weather.gov`.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct NwsClient {
    client: Client,
    base_url: String,
    zone_feed: PathBuf,
    fault_injector: Option<Arc<FaultInjector>>,
}

impl NwsClient {
    /// Create a new API client from configuration.
    pub fn new(config: &CacheConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Unexpected(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            zone_feed: config.zone_feed.clone(),
            fault_injector: None,
        })
    }

    /// Attach a synthetic fault source. Demo and test use only.
    pub fn with_fault_injector(mut self, injector: Arc<FaultInjector>) -> Self {
        self.fault_injector = Some(injector);
        self
    }

    fn check_fault(&self) -> Result<(), ApiError> {
        if let Some(ref injector) = self.fault_injector {
            if injector.should_fail() {
                return Err(ApiError::Unexpected("synthetic fault injected".into()));
            }
        }
        Ok(())
    }

    /// Load zones from the bundled zone feed.
    ///
    /// A missing feed file is treated as an empty feed, not an error.
    /// Zones without observation stations are dropped and duplicate
    /// entries collapse, preserving first-seen order.
    pub async fn fetch_zones(&self) -> Result<Vec<Zone>, ApiError> {
        self.check_fault()?;

        let raw = match tokio::fs::read_to_string(&self.zone_feed).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %self.zone_feed.display(), "Zone feed missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ApiError::Unexpected(format!(
                    "failed to read zone feed {}: {}",
                    self.zone_feed.display(),
                    e
                )))
            }
        };

        let zones = parse_zone_feed(&raw)?;
        debug!(zones = zones.len(), "Loaded zone feed");
        Ok(zones)
    }

    /// Fetch the forecast periods for one zone.
    pub async fn fetch_forecast(&self, zone_id: &str) -> Result<Vec<Forecast>, ApiError> {
        self.check_fault()?;

        let url = format!(
            "{}/zones/forecast/{}/forecast",
            self.base_url,
            urlencoding::encode(zone_id)
        );
        debug!(zone = zone_id, url = %url, "Fetching zone forecast");

        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(|e| ApiError::Transient(format!("GET {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transient(format!("failed to read response body: {}", e)))?;

        let parsed: ForecastResponse = serde_json::from_str(&body).map_err(|e| {
            ApiError::Unexpected(format!("malformed forecast payload for {}: {}", zone_id, e))
        })?;

        let periods: Vec<Forecast> = parsed
            .properties
            .periods
            .into_iter()
            .map(Forecast::from)
            .collect();
        debug!(zone = zone_id, periods = periods.len(), "Fetched forecast periods");
        Ok(periods)
    }
}

impl Upstream for NwsClient {
    fn fetch_zones(&self) -> impl Future<Output = Result<Vec<Zone>, ApiError>> + Send {
        let client = self.clone();
        async move { client.fetch_zones().await }
    }

    fn fetch_forecast(
        &self,
        zone_id: &str,
    ) -> impl Future<Output = Result<Vec<Forecast>, ApiError>> + Send {
        let client = self.clone();
        let zone_id = zone_id.to_string();
        async move { client.fetch_forecast(&zone_id).await }
    }
}

/// Parse the GeoJSON zone feed into domain zones, filtering out zones
/// with no observation stations and collapsing duplicates.
fn parse_zone_feed(raw: &str) -> Result<Vec<Zone>, ApiError> {
    let feed: ZoneFeed = serde_json::from_str(raw)
        .map_err(|e| ApiError::Unexpected(format!("malformed zone feed: {}", e)))?;

    let mut seen = HashSet::new();
    let mut zones = Vec::new();
    for feature in feed.features {
        let zone = Zone::from(feature.properties);
        if zone.observation_stations.is_empty() {
            debug!(zone = %zone.id, "Skipping zone with no observation stations");
            continue;
        }
        if seen.insert(zone.clone()) {
            zones.push(zone);
        }
    }
    Ok(zones)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(zone_feed: &str) -> CacheConfig {
        CacheConfig {
            zone_feed: PathBuf::from(zone_feed),
            ..CacheConfig::default()
        }
    }

    #[test]
    fn test_parse_zone_feed_filters_stationless_zones() {
        let zones = parse_zone_feed(
            r#"{
                "features": [
                    {"properties": {"id": "AKZ318", "name": "Haines", "state": "AK",
                                    "observationStations": ["S1"]}},
                    {"properties": {"id": "AKZ200", "name": "Denali", "state": "AK",
                                    "observationStations": []}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id, "AKZ318");
    }

    #[test]
    fn test_parse_zone_feed_dedupes_by_value() {
        let zones = parse_zone_feed(
            r#"{
                "features": [
                    {"properties": {"id": "AKZ318", "name": "Haines", "state": "AK",
                                    "observationStations": ["S1"]}},
                    {"properties": {"id": "AKZ318", "name": "Haines", "state": "AK",
                                    "observationStations": ["S1"]}},
                    {"properties": {"id": "AKZ318", "name": "Haines", "state": "AK",
                                    "observationStations": ["S1", "S2"]}}
                ]
            }"#,
        )
        .unwrap();

        // The exact duplicate collapses, the variant with different
        // stations is a distinct value.
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[0].observation_stations, vec!["S1"]);
        assert_eq!(zones[1].observation_stations, vec!["S1", "S2"]);
    }

    #[test]
    fn test_parse_zone_feed_empty_features() {
        assert!(parse_zone_feed(r#"{"features": []}"#).unwrap().is_empty());
        assert!(parse_zone_feed(r#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_zone_feed_malformed() {
        let err = parse_zone_feed("not json").unwrap_err();
        assert!(matches!(err, ApiError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_fetch_zones_missing_feed_is_empty() {
        let client = NwsClient::new(&test_config("/nonexistent/zones.json")).unwrap();
        let zones = client.fetch_zones().await.unwrap();
        assert!(zones.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_zones_reads_feed_file() {
        let path = std::env::temp_dir().join(format!("zonecache-feed-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"features": [{"properties": {"id": "AKZ318", "name": "Haines",
                "state": "AK", "observationStations": ["S1"]}}]}"#,
        )
        .unwrap();

        let client = NwsClient::new(&test_config(path.to_str().unwrap())).unwrap();
        let zones = client.fetch_zones().await.unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].id, "AKZ318");
    }

    #[test]
    fn test_fault_injector_cadence() {
        let injector = FaultInjector::every(5);
        let failures: Vec<bool> = (0..10).map(|_| injector.should_fail()).collect();
        assert_eq!(
            failures,
            vec![false, false, false, false, true, false, false, false, false, true]
        );
    }

    #[tokio::test]
    async fn test_fault_injector_fails_fetch() {
        let client = NwsClient::new(&test_config("/nonexistent/zones.json"))
            .unwrap()
            .with_fault_injector(Arc::new(FaultInjector::every(1)));
        let err = client.fetch_zones().await.unwrap_err();
        assert!(matches!(err, ApiError::Unexpected(_)));
    }
}
