/// Core data types for the flood risk service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no business logic — only types, their serialized
/// shapes, and the provider error taxonomy.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Geocoding and weather types
// ---------------------------------------------------------------------------

/// A geocoded place: free-text city name resolved to WGS84 coordinates.
///
/// Produced by `ingest::geocode` from the first (and only requested)
/// candidate of a geocoding lookup. Ephemeral — never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for a city, normalized from the weather provider.
///
/// `rain_1h` is rainfall over the last hour in millimeters; the provider
/// omits the field entirely during dry weather, so absence is normalized
/// to 0 at parse time rather than treated as an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temp: f64,
    pub humidity: f64,
    pub description: String,
    pub rain_1h: f64,
}

/// One forecast hour's rainfall, in millimeters.
///
/// Series are ordered by time ascending; index 0 is the current/next hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRainSample {
    pub rain_mm: f64,
}

// ---------------------------------------------------------------------------
// Risk assessment types
// ---------------------------------------------------------------------------

/// Three-level risk classification derived solely from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// The rainfall quantities the scorer extracted from the hourly series.
///
/// `rain_1h_mm` is carried for response compatibility; the score and level
/// are functions of the 3h and 24h windows only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainSignals {
    pub rain_1h_mm: f64,
    pub rain_3h_mm: f64,
    pub rain_24h_mm: f64,
}

/// A complete risk assessment for one forecast series.
///
/// Computed fresh per request and never persisted: the whole struct is a
/// deterministic function of the input rainfall series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: i64,
    pub reason: String,
    pub signals: RainSignals,
    pub alerts: Vec<String>,
}

// ---------------------------------------------------------------------------
// River level prediction types
// ---------------------------------------------------------------------------

/// Flood stage classification of a predicted river level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FloodStatus {
    Safe,
    FloodWarning,
}

impl std::fmt::Display for FloodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloodStatus::Safe => write!(f, "SAFE"),
            FloodStatus::FloodWarning => write!(f, "FLOOD WARNING"),
        }
    }
}

/// Regression output: predicted river level plus its classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloodPrediction {
    pub predicted_level_m: f64,
    pub status: FloodStatus,
}

// ---------------------------------------------------------------------------
// Bulletin board types
// ---------------------------------------------------------------------------

/// A community-submitted aid request or offer.
///
/// `ts` is epoch milliseconds assigned at insert; rows are immutable once
/// created (there are no update or delete operations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletinItem {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String, // "req" or "offer"
    pub name: String,
    pub contact: String,
    pub location: String,
    pub details: String,
    pub ts: i64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when calling the weather or geocoding provider.
#[derive(Debug, PartialEq)]
pub enum ProviderError {
    /// Non-2xx HTTP response; the upstream body text is preserved as the
    /// diagnostic.
    Upstream { status: u16, body: String },
    /// Network failure or the fixed per-call timeout elapsed.
    Transport(String),
    /// The response body could not be deserialized.
    Parse(String),
    /// The geocoding lookup returned zero candidates for this city.
    NotFound(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Upstream { status, body } => {
                write!(f, "Upstream error ({}): {}", status, body)
            }
            ProviderError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ProviderError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ProviderError::NotFound(city) => write!(f, "City not found: {}", city),
        }
    }
}

impl std::error::Error for ProviderError {}
