use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Resolved coordinates and canonical display name for a city query
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct GeocodeResult {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

/// Wall-clock instant at the resolved location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTime {
    /// Epoch milliseconds of UTC-now shifted by the location's offset
    pub timestamp: i64,
    /// ISO-8601 rendering of `timestamp`
    pub formatted: String,
    /// Offset as reported by the prayer-time provider, echoed verbatim
    pub utc_offset: String,
}

/// Combined geocode, prayer-time payload and local clock for one city
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrayerDataResult {
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    #[schema(value_type = Object)]
    pub prayer_times: serde_json::Value,
    pub is_indonesia: bool,
    pub current_time: CurrentTime,
}
