//! Data models for zone and forecast data.
//!
//! Domain records are immutable values; equality is by value. Each module
//! also defines the wire structures for the upstream JSON the domain type
//! is parsed from, kept separate from the domain types:
//!
//! - `Zone`: a forecast zone from the bundled GeoJSON zone feed
//! - `Forecast`: one forecast period from the per-zone forecast endpoint

pub mod forecast;
pub mod zone;

pub use forecast::{Forecast, ForecastPeriod, ForecastProperties, ForecastResponse};
pub use zone::{Zone, ZoneFeature, ZoneFeed, ZoneProperties};
