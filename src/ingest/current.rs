/// OpenWeather current conditions API client.
///
/// Retrieves live weather for a city and normalizes it into a
/// `WeatherSnapshot`:
///   https://api.openweathermap.org/data/2.5/weather
///
/// The snapshot feeds the river level predictor (via rain_1h) and the
/// advisory prompt (via description and city name).

use crate::model::{ProviderError, WeatherSnapshot};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde structures for current weather JSON deserialization
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CurrentResponse {
    name: String,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    rain: Option<RainVolume>,
}

#[derive(Deserialize)]
struct MainBlock {
    temp: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct ConditionBlock {
    description: String,
}

#[derive(Deserialize)]
struct RainVolume {
    #[serde(rename = "1h", default)]
    one_hour: f64,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

const CURRENT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Builds a current-conditions URL for the given city in metric units.
pub fn build_current_url(city: &str, api_key: &str) -> String {
    format!(
        "{}?q={}&units=metric&appid={}",
        CURRENT_BASE_URL,
        urlencoding::encode(city),
        api_key
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a current-conditions response body into a `WeatherSnapshot`.
///
/// Dry weather omits the rain block, which normalizes to 0 mm. A missing
/// conditions array falls back to an "unknown" description.
///
/// # Errors
/// - `ProviderError::Parse` — malformed or unexpected JSON structure.
pub fn parse_current_response(json: &str) -> Result<WeatherSnapshot, ProviderError> {
    let response: CurrentResponse = serde_json::from_str(json).map_err(|e| {
        ProviderError::Parse(format!("current weather JSON deserialization failed: {}", e))
    })?;

    let description = response
        .weather
        .first()
        .map(|c| c.description.clone())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(WeatherSnapshot {
        city: response.name,
        temp: response.main.temp,
        humidity: response.main.humidity,
        description,
        rain_1h: response.rain.map(|r| r.one_hour).unwrap_or(0.0),
    })
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Fetch current conditions for a city. One outbound call, no retry.
pub fn fetch_current(
    http: &reqwest::blocking::Client,
    api_key: &str,
    city: &str,
) -> Result<WeatherSnapshot, ProviderError> {
    let url = build_current_url(city, api_key);

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

    parse_current_response(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
