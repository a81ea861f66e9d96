//! Prometheus instrumentation for the cache.
//!
//! Metrics are observability only; emission never affects the data a
//! lookup returns. The registry, and whatever exporter scrapes it,
//! belongs to the host service.

use prometheus::{Histogram, HistogramOpts, IntCounter, Opts, Registry};

/// Counters and histograms emitted by the forecast cache.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    /// Reads served from a live cache entry.
    pub cache_hits: IntCounter,
    /// Reads that triggered or joined an upstream populate.
    pub cache_misses: IntCounter,
    /// Total forecast reads, hits and misses alike.
    pub forecast_requests: IntCounter,
    /// Forecast reads that surfaced an error.
    pub forecast_failures: IntCounter,
    /// End-to-end forecast read duration in seconds.
    pub forecast_request_duration: Histogram,
}

impl CacheMetrics {
    /// Build the metric family and register it with `registry`.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let cache_hits = IntCounter::with_opts(Opts::new(
            "zonecache_cache_hits_total",
            "Reads served from a live cache entry.",
        ))?;
        let cache_misses = IntCounter::with_opts(Opts::new(
            "zonecache_cache_misses_total",
            "Reads that triggered or joined an upstream populate.",
        ))?;
        let forecast_requests = IntCounter::with_opts(Opts::new(
            "zonecache_forecast_requests_total",
            "Total forecast reads.",
        ))?;
        let forecast_failures = IntCounter::with_opts(Opts::new(
            "zonecache_forecast_failures_total",
            "Forecast reads that surfaced an error.",
        ))?;
        let forecast_request_duration = Histogram::with_opts(HistogramOpts::new(
            "zonecache_forecast_request_duration_seconds",
            "End-to-end duration of forecast reads, including upstream fetches.",
        ))?;

        registry.register(Box::new(cache_hits.clone()))?;
        registry.register(Box::new(cache_misses.clone()))?;
        registry.register(Box::new(forecast_requests.clone()))?;
        registry.register(Box::new(forecast_failures.clone()))?;
        registry.register(Box::new(forecast_request_duration.clone()))?;

        Ok(Self {
            cache_hits,
            cache_misses,
            forecast_requests,
            forecast_failures,
            forecast_request_duration,
        })
    }

    /// Metrics backed by a private registry, for embedders and tests
    /// that do not export.
    pub fn unregistered() -> Self {
        Self::new(&Registry::new()).expect("metric registration on a fresh registry cannot collide")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_register_once() {
        let registry = Registry::new();
        let metrics = CacheMetrics::new(&registry).unwrap();
        metrics.cache_hits.inc();
        metrics.forecast_request_duration.observe(0.25);

        // Re-registering the same family on one registry collides.
        assert!(CacheMetrics::new(&registry).is_err());
        assert_eq!(registry.gather().len(), 5);
    }

    #[test]
    fn test_unregistered_metrics_are_independent() {
        let a = CacheMetrics::unregistered();
        let b = CacheMetrics::unregistered();
        a.cache_hits.inc();
        assert_eq!(a.cache_hits.get(), 1);
        assert_eq!(b.cache_hits.get(), 0);
    }
}
