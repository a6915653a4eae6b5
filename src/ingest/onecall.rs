/// OpenWeather One Call API client.
///
/// Retrieves the hourly forecast for a coordinate pair and extracts the
/// per-hour rainfall series consumed by the risk scorer:
///   https://api.openweathermap.org/data/2.5/onecall
///
/// Minutely data is excluded from the request. Hours without a rain block
/// are dry hours, not errors — they parse to 0 mm.

use crate::model::{HourlyRainSample, ProviderError};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde structures for One Call JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct OneCallResponse {
    #[serde(default)]
    hourly: Vec<HourlyEntry>,
}

#[derive(Deserialize)]
struct HourlyEntry {
    #[serde(default)]
    rain: Option<RainVolume>,
}

/// The provider nests rainfall under a "1h" key, present only when rain
/// is expected for that hour.
#[derive(Deserialize)]
struct RainVolume {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

const ONECALL_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/onecall";

/// Builds a One Call URL for the given coordinates, excluding minutely
/// granularity and requesting metric units.
pub fn build_onecall_url(lat: f64, lon: f64, api_key: &str) -> String {
    format!(
        "{}?lat={}&lon={}&exclude=minutely&units=metric&appid={}",
        ONECALL_BASE_URL, lat, lon, api_key
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a One Call response body into the ordered hourly rainfall
/// series (time ascending, index 0 = current/next hour).
///
/// A missing `hourly` array parses as an empty series, and a missing
/// `rain` block on any hour parses as 0 mm.
///
/// # Errors
/// - `ProviderError::Parse` — malformed or unexpected JSON structure.
pub fn parse_hourly_rain(json: &str) -> Result<Vec<HourlyRainSample>, ProviderError> {
    let response: OneCallResponse = serde_json::from_str(json)
        .map_err(|e| ProviderError::Parse(format!("One Call JSON deserialization failed: {}", e)))?;

    let samples = response
        .hourly
        .into_iter()
        .map(|entry| HourlyRainSample {
            rain_mm: entry.rain.map(|r| r.one_hour).unwrap_or(0.0),
        })
        .collect();

    Ok(samples)
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Fetch the hourly rainfall forecast for a coordinate pair.
///
/// One outbound call, no retry. Non-success upstream status preserves the
/// provider's response text.
pub fn fetch_hourly_rain(
    http: &reqwest::blocking::Client,
    api_key: &str,
    lat: f64,
    lon: f64,
) -> Result<Vec<HourlyRainSample>, ProviderError> {
    let url = build_onecall_url(lat, lon, api_key);

    let response = http
        .get(&url)
        .send()
        .map_err(|e| ProviderError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .map_err(|e| ProviderError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(ProviderError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    parse_hourly_rain(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
