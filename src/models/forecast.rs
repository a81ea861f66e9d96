//! Domain model for forecast periods.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single forecast period for one zone.
///
/// Produced fresh on every successful upstream fetch; the whole period
/// array for a zone is the cached unit, never individual periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Sequence number within the zone's forecast, starting at 1.
    pub number: u32,
    /// Period label, e.g. "Tonight".
    pub name: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Short description, e.g. "Partly Cloudy".
    pub short_forecast: String,
    /// Detailed narrative text.
    pub detailed_forecast: String,
    pub temperature: Option<i64>,
    pub temperature_unit: String,
    pub wind_speed: String,
    pub wind_direction: String,
}

// ============================================================================
// Forecast endpoint wire types
// ============================================================================

/// Response from `/zones/forecast/{id}/forecast`.
#[derive(Debug, Default, Deserialize)]
pub struct ForecastResponse {
    /// Absent `properties` is treated the same as an empty period list.
    #[serde(default)]
    pub properties: ForecastProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct ForecastProperties {
    #[serde(default)]
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastPeriod {
    pub number: u32,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "startTime", default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(rename = "endTime", default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(rename = "shortForecast", default)]
    pub short_forecast: String,
    #[serde(rename = "detailedForecast", default)]
    pub detailed_forecast: String,
    #[serde(default)]
    pub temperature: Option<i64>,
    #[serde(rename = "temperatureUnit", default)]
    pub temperature_unit: String,
    #[serde(rename = "windSpeed", default)]
    pub wind_speed: String,
    #[serde(rename = "windDirection", default)]
    pub wind_direction: String,
}

impl From<ForecastPeriod> for Forecast {
    fn from(period: ForecastPeriod) -> Self {
        Self {
            number: period.number,
            name: period.name,
            start_time: period.start_time,
            end_time: period.end_time,
            short_forecast: period.short_forecast,
            detailed_forecast: period.detailed_forecast,
            temperature: period.temperature,
            temperature_unit: period.temperature_unit,
            wind_speed: period.wind_speed,
            wind_direction: period.wind_direction,
        }
    }
}
