//! In-memory read-through caching for zone and forecast data.
//!
//! This module provides the `ForecastCache`: lookups hit a live entry or
//! populate it from the upstream client, with a single in-flight fetch
//! per key shared by all concurrent callers. Entries expire at an
//! absolute deadline fixed at creation; refresh is lazy, on the next
//! read after expiry.
//!
//! Cached keys:
//! - `"zones"`: the zone list, 1 hour by default
//! - one key per zone id for forecast periods, 15 minutes by default

pub mod entry;
pub mod flight;
pub mod metrics;
pub mod store;

pub use entry::CacheEntry;
pub use metrics::CacheMetrics;
pub use store::ForecastCache;
