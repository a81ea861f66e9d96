//! Read-through cache over the upstream client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Duration;
use tracing::{debug, error, warn};

use crate::api::{ApiError, Upstream};
use crate::clock::Clock;
use crate::config::CacheConfig;
use crate::models::{Forecast, Zone};

use super::flight::FlightMap;
use super::metrics::CacheMetrics;

/// Cache key for the singleton zone list.
const ZONES_KEY: &str = "zones";

/// Read-through cache for zone and forecast data.
///
/// Reads either hit a live entry or populate it from the upstream
/// client, with at most one fetch in flight per key. Zone and forecast
/// entries expire independently; forecast entries are keyed per zone, so
/// one zone's refresh never affects another's deadline.
///
/// Callers receive owned copies of cached values; entries themselves are
/// never handed out mutably.
pub struct ForecastCache<C> {
    client: Arc<C>,
    clock: Arc<dyn Clock>,
    metrics: Arc<CacheMetrics>,
    zones_ttl: Duration,
    forecast_ttl: Duration,
    zones: FlightMap<&'static str, Vec<Zone>>,
    forecasts: FlightMap<String, Vec<Forecast>>,
    /// Sequential request counter, for log correlation only.
    requests: AtomicU64,
}

impl<C: Upstream> ForecastCache<C> {
    pub fn new(
        client: Arc<C>,
        clock: Arc<dyn Clock>,
        config: &CacheConfig,
        metrics: Arc<CacheMetrics>,
    ) -> Self {
        Self {
            client,
            clock,
            metrics,
            zones_ttl: Duration::seconds(config.zones_ttl_secs as i64),
            forecast_ttl: Duration::seconds(config.forecast_ttl_secs as i64),
            zones: FlightMap::new(),
            forecasts: FlightMap::new(),
            requests: AtomicU64::new(0),
        }
    }

    /// The zone list, cached for `zones_ttl` (1 hour by default).
    pub async fn get_zones(&self) -> Result<Vec<Zone>, ApiError> {
        let request = self.next_request();

        let fetch = {
            let client = Arc::clone(&self.client);
            async move { client.fetch_zones().await }
        };
        let (result, hit) = self
            .zones
            .get_or_populate(ZONES_KEY, Arc::clone(&self.clock), self.zones_ttl, fetch)
            .await;

        if hit {
            self.metrics.cache_hits.inc();
            debug!(request, key = ZONES_KEY, "Cache hit");
        } else {
            self.metrics.cache_misses.inc();
            debug!(request, key = ZONES_KEY, "Cache miss, populated from zone feed");
        }
        result
    }

    /// Forecast periods for one zone, cached per zone for `forecast_ttl`
    /// (15 minutes by default).
    ///
    /// Failures are never cached; the next read for the same zone
    /// fetches again.
    pub async fn get_forecast(&self, zone_id: &str) -> Result<Vec<Forecast>, ApiError> {
        let request = self.next_request();
        self.metrics.forecast_requests.inc();
        let started = Instant::now();

        let fetch = {
            let client = Arc::clone(&self.client);
            let zone_id = zone_id.to_string();
            async move { client.fetch_forecast(&zone_id).await }
        };
        let (result, hit) = self
            .forecasts
            .get_or_populate(
                zone_id.to_string(),
                Arc::clone(&self.clock),
                self.forecast_ttl,
                fetch,
            )
            .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.metrics
            .forecast_request_duration
            .observe(started.elapsed().as_secs_f64());

        match &result {
            Ok(periods) if hit => {
                self.metrics.cache_hits.inc();
                debug!(request, zone = zone_id, periods = periods.len(), "Cache hit");
            }
            Ok(periods) => {
                self.metrics.cache_misses.inc();
                debug!(
                    request,
                    zone = zone_id,
                    periods = periods.len(),
                    elapsed_ms,
                    "Cache miss, populated from upstream"
                );
            }
            Err(err) => {
                self.metrics.cache_misses.inc();
                self.metrics.forecast_failures.inc();
                match err {
                    ApiError::Unexpected(_) => {
                        error!(request, zone = zone_id, elapsed_ms, error = %err, "Forecast fetch failed")
                    }
                    _ => {
                        warn!(request, zone = zone_id, elapsed_ms, error = %err, "Forecast fetch failed")
                    }
                }
            }
        }
        result
    }

    fn next_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    #[cfg(test)]
    fn forecast_expires_at(&self, zone_id: &str) -> Option<chrono::DateTime<chrono::Utc>> {
        self.forecasts.expires_at(&zone_id.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
