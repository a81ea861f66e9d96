//! Read-through caching for National Weather Service zone and forecast data.
//!
//! This crate provides the data layer of a weather lookup service:
//!
//! - [`NwsClient`]: fetches the bundled zone feed and per-zone forecasts
//!   from `api.weather.gov`, converting wire payloads into domain records.
//! - [`ForecastCache`]: an in-memory read-through cache with absolute
//!   per-entry expiration and single-flight population, so concurrent
//!   misses on one key share a single upstream fetch.
//!
//! The cache is constructed explicitly from its collaborators (upstream
//! client, clock, configuration, metrics) — there is no ambient global
//! instance. HTTP routing, response caching, and metric export belong to
//! the host service.

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod models;

pub use api::{ApiError, FaultInjector, NwsClient, Upstream};
pub use cache::{CacheMetrics, ForecastCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use models::{Forecast, Zone};
