//! Domain model for forecast zones.
//!
//! Zones are loaded from the bundled GeoJSON zone feed. A zone without at
//! least one observation station cannot produce observations, so such
//! entries are dropped during feed parsing.

use serde::{Deserialize, Serialize};

/// A named geographic forecast zone with its observation stations.
///
/// Immutable value; equality and hashing cover all fields so duplicate
/// feed entries collapse during load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    /// Zone code, e.g. `"AKZ318"`.
    pub id: String,
    pub name: String,
    pub state: String,
    pub observation_stations: Vec<String>,
}

// ============================================================================
// Zone feed wire types (GeoJSON)
// ============================================================================

/// Top-level shape of the zone feed: a GeoJSON feature collection.
#[derive(Debug, Deserialize)]
pub struct ZoneFeed {
    #[serde(default)]
    pub features: Vec<ZoneFeature>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneFeature {
    pub properties: ZoneProperties,
}

#[derive(Debug, Deserialize)]
pub struct ZoneProperties {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "observationStations", default)]
    pub observation_stations: Vec<String>,
}

impl From<ZoneProperties> for Zone {
    fn from(properties: ZoneProperties) -> Self {
        Self {
            id: properties.id,
            name: properties.name,
            state: properties.state,
            observation_stations: properties.observation_stations,
        }
    }
}
