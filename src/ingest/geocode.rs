/// OpenWeather direct geocoding API client.
///
/// Handles URL construction and JSON response parsing for the geocoding
/// endpoint:
///   http://api.openweathermap.org/geo/1.0/direct
///
/// Every lookup is scoped to a single country and requests exactly one
/// candidate; the first (only) candidate wins. See `fixtures.rs` for
/// annotated examples of the response structure.

use crate::model::{Location, ProviderError};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Serde structures for geocoding JSON deserialization
// ---------------------------------------------------------------------------

/// One candidate in the (top-level array) geocoding response.
#[derive(Deserialize)]
struct GeoCandidate {
    #[serde(default)]
    name: String,
    lat: f64,
    lon: f64,
}

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

const GEO_BASE_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";

/// Builds a geocoding URL for the given city, scoped to `country_code`
/// with result-limit 1. The city is percent-encoded; the country code is
/// appended after a comma as the provider expects.
pub fn build_geocode_url(city: &str, country_code: &str, api_key: &str) -> String {
    format!(
        "{}?q={},{}&limit=1&appid={}",
        GEO_BASE_URL,
        urlencoding::encode(city),
        country_code,
        api_key
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a geocoding response body into a `Location`.
///
/// The queried city name is used as a fallback when the candidate carries
/// no name of its own.
///
/// # Errors
/// - `ProviderError::Parse` — malformed or unexpected JSON structure.
/// - `ProviderError::NotFound` — the provider returned zero candidates.
pub fn parse_geocode_response(json: &str, city: &str) -> Result<Location, ProviderError> {
    let candidates: Vec<GeoCandidate> = serde_json::from_str(json)
        .map_err(|e| ProviderError::Parse(format!("geocode JSON deserialization failed: {}", e)))?;

    let first = candidates
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::NotFound(city.to_string()))?;

    let name = if first.name.is_empty() {
        city.to_string()
    } else {
        first.name
    };

    Ok(Location {
        name,
        lat: first.lat,
        lon: first.lon,
    })
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// Resolve a city name to coordinates with a single lookup request.
///
/// One outbound call per invocation; no caching, no retry. A non-success
/// upstream status preserves the provider's response text as the
/// diagnostic.
pub fn fetch_location(
    http: &reqwest::blocking::Client,
    api_key: &str,
    country_code: &str,
    city: &str,
) -> Result<Location, ProviderError> {
    let url = build_geocode_url(city, country_code, api_key);

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

    parse_geocode_response(&body, city)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;

    // --- URL construction ---------------------------------------------------

    #[test]
    fn test_build_url_targets_direct_geocoding_endpoint() {
        let url = build_geocode_url("Guwahati", "IN", "test-key");
        assert!(
            url.contains("api.openweathermap.org/geo/1.0/direct"),
            "must target the direct geocoding endpoint, got: {}",
            url
        );
    }

    #[test]
    fn test_build_url_requests_single_candidate() {
        let url = build_geocode_url("Guwahati", "IN", "test-key");
        assert!(url.contains("limit=1"), "must request exactly one candidate");
    }

    #[test]
    fn test_build_url_scopes_to_country() {
        let url = build_geocode_url("Guwahati", "IN", "test-key");
        assert!(
            url.contains("q=Guwahati,IN"),
            "query must append the country code, got: {}",
            url
        );
    }

    #[test]
    fn test_build_url_percent_encodes_city() {
        let url = build_geocode_url("New Delhi", "IN", "test-key");
        assert!(
            url.contains("New%20Delhi"),
            "spaces in city names must be percent-encoded, got: {}",
            url
        );
        assert!(!url.contains("New Delhi"), "raw space must not survive");
    }

    #[test]
    fn test_build_url_includes_api_key() {
        let url = build_geocode_url("Guwahati", "IN", "test-key");
        assert!(url.contains("appid=test-key"));
    }

    // --- Parsing: happy path ------------------------------------------------

    #[test]
    fn test_parse_single_candidate() {
        let location = parse_geocode_response(fixture_geocode_guwahati_json(), "Guwahati")
            .expect("valid fixture should parse");

        assert_eq!(location.name, "Guwahati");
        assert!((location.lat - 26.1805978).abs() < 1e-6);
        assert!((location.lon - 91.7538817).abs() < 1e-6);
    }

    #[test]
    fn test_parse_first_candidate_wins() {
        // Even if the provider ignores limit=1 and returns several
        // candidates, only the first is used.
        let location = parse_geocode_response(fixture_geocode_two_candidates_json(), "Salem")
            .expect("multi-candidate fixture should parse");
        assert_eq!(location.name, "Salem");
        assert!((location.lat - 11.6538).abs() < 1e-4, "must take the first candidate");
    }

    #[test]
    fn test_parse_missing_name_falls_back_to_query() {
        let json = r#"[{ "lat": 19.0, "lon": 73.0, "country": "IN" }]"#;
        let location = parse_geocode_response(json, "Panvel").expect("should parse");
        assert_eq!(
            location.name, "Panvel",
            "candidate without a name should echo the queried city"
        );
    }

    // --- Parsing: error and edge cases --------------------------------------

    #[test]
    fn test_parse_empty_candidates_returns_not_found() {
        let result = parse_geocode_response(fixture_geocode_empty_json(), "Atlantis");
        assert_eq!(
            result,
            Err(ProviderError::NotFound("Atlantis".to_string())),
            "zero candidates must be NotFound, not a crash"
        );
    }

    #[test]
    fn test_parse_malformed_json_returns_parse_error() {
        let result = parse_geocode_response("{ not json ]", "Guwahati");
        assert!(
            matches!(result, Err(ProviderError::Parse(_))),
            "malformed JSON should return Parse, got {:?}",
            result
        );
    }

    #[test]
    fn test_parse_object_instead_of_array_returns_parse_error() {
        // OpenWeather returns error bodies as objects, e.g. {"cod":401,...}.
        let result = parse_geocode_response(r#"{"cod": 401, "message": "Invalid API key"}"#, "X");
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }
}
