/// Test fixtures: representative JSON payloads from the OpenWeather and
/// Gemini APIs.
///
/// These fixtures are structurally complete but truncated to the minimum
/// needed to exercise the parsers.
///
/// Geocoding response shape (top-level ARRAY, not an object):
///   [ { "name", "lat", "lon", "country", "state" } ]
///
/// One Call response shape:
///   { "lat", "lon", "current": {...}, "hourly": [ { "dt", "temp",
///     "rain": { "1h": <mm> } } ] }
///   The "rain" block is ABSENT for dry hours.
///
/// Current weather response shape:
///   { "name", "main": { "temp", "humidity" }, "weather": [ {
///     "description" } ], "rain": { "1h": <mm> } }
///   Again, "rain" is absent in dry weather.
///
/// Gemini generateContent response shape:
///   { "candidates": [ { "content": { "parts": [ { "text" } ] } } ] }

/// Single geocoding candidate for Guwahati, scoped to IN.
#[cfg(test)]
pub(crate) fn fixture_geocode_guwahati_json() -> &'static str {
    r#"[
      {
        "name": "Guwahati",
        "local_names": { "en": "Guwahati", "hi": "गुवाहाटी" },
        "lat": 26.1805978,
        "lon": 91.7538817,
        "country": "IN",
        "state": "Assam"
      }
    ]"#
}

/// Two candidates for an ambiguous city name — only the first may be used.
#[cfg(test)]
pub(crate) fn fixture_geocode_two_candidates_json() -> &'static str {
    r#"[
      {
        "name": "Salem",
        "lat": 11.6538,
        "lon": 78.1554,
        "country": "IN",
        "state": "Tamil Nadu"
      },
      {
        "name": "Salem",
        "lat": 44.9429,
        "lon": -123.0351,
        "country": "US",
        "state": "Oregon"
      }
    ]"#
}

/// Zero candidates — the provider found nothing for the query.
#[cfg(test)]
pub(crate) fn fixture_geocode_empty_json() -> &'static str {
    "[]"
}

/// One Call response with four forecast hours: three rainy, the last dry
/// (no rain block). Non-rain fields are included to mirror the real
/// envelope the parser must skip over.
#[cfg(test)]
pub(crate) fn fixture_onecall_mixed_rain_json() -> &'static str {
    r#"{
      "lat": 26.1806,
      "lon": 91.7539,
      "timezone": "Asia/Kolkata",
      "timezone_offset": 19800,
      "current": {
        "dt": 1717236000,
        "temp": 27.4,
        "humidity": 89,
        "weather": [ { "id": 500, "main": "Rain", "description": "light rain" } ]
      },
      "hourly": [
        {
          "dt": 1717236000,
          "temp": 27.4,
          "humidity": 89,
          "pop": 0.95,
          "rain": { "1h": 5.0 },
          "weather": [ { "id": 501, "main": "Rain", "description": "moderate rain" } ]
        },
        {
          "dt": 1717239600,
          "temp": 26.8,
          "humidity": 92,
          "pop": 0.97,
          "rain": { "1h": 6.0 },
          "weather": [ { "id": 501, "main": "Rain", "description": "moderate rain" } ]
        },
        {
          "dt": 1717243200,
          "temp": 26.5,
          "humidity": 93,
          "pop": 0.9,
          "rain": { "1h": 5.0 },
          "weather": [ { "id": 500, "main": "Rain", "description": "light rain" } ]
        },
        {
          "dt": 1717246800,
          "temp": 26.9,
          "humidity": 88,
          "pop": 0.2,
          "weather": [ { "id": 803, "main": "Clouds", "description": "broken clouds" } ]
        }
      ]
    }"#
}

/// One Call response without an hourly array at all (the provider can
/// drop blocks it has no data for). Must parse as an empty series.
#[cfg(test)]
pub(crate) fn fixture_onecall_no_hourly_json() -> &'static str {
    r#"{
      "lat": 26.1806,
      "lon": 91.7539,
      "timezone": "Asia/Kolkata",
      "timezone_offset": 19800,
      "current": {
        "dt": 1717236000,
        "temp": 31.2,
        "humidity": 62,
        "weather": [ { "id": 800, "main": "Clear", "description": "clear sky" } ]
      }
    }"#
}

/// Current conditions during light rain, including the 1h rain volume.
#[cfg(test)]
pub(crate) fn fixture_current_light_rain_json() -> &'static str {
    r#"{
      "coord": { "lon": 91.7539, "lat": 26.1806 },
      "weather": [ { "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" } ],
      "base": "stations",
      "main": {
        "temp": 27.4,
        "feels_like": 31.6,
        "temp_min": 27.4,
        "temp_max": 27.4,
        "pressure": 1004,
        "humidity": 89
      },
      "visibility": 3000,
      "wind": { "speed": 2.06, "deg": 80 },
      "rain": { "1h": 0.31 },
      "clouds": { "all": 75 },
      "dt": 1717236000,
      "name": "Guwahati",
      "cod": 200
    }"#
}

/// Current conditions in dry weather — no rain block present.
#[cfg(test)]
pub(crate) fn fixture_current_clear_sky_json() -> &'static str {
    r#"{
      "coord": { "lon": 91.7539, "lat": 26.1806 },
      "weather": [ { "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" } ],
      "base": "stations",
      "main": {
        "temp": 31.2,
        "feels_like": 33.0,
        "temp_min": 31.2,
        "temp_max": 31.2,
        "pressure": 1008,
        "humidity": 62
      },
      "visibility": 10000,
      "wind": { "speed": 3.1, "deg": 140 },
      "clouds": { "all": 5 },
      "dt": 1717322400,
      "name": "Guwahati",
      "cod": 200
    }"#
}

/// Gemini generateContent response with a single candidate carrying the
/// checklist text.
#[cfg(test)]
pub(crate) fn fixture_gemini_checklist_json() -> &'static str {
    r#"{
      "candidates": [
        {
          "content": {
            "parts": [
              { "text": "1. Water levels are rising near the river.\n2. Move valuables to upper floors.\n3. Keep emergency contacts handy." }
            ],
            "role": "model"
          },
          "finishReason": "STOP",
          "index": 0
        }
      ],
      "usageMetadata": { "promptTokenCount": 118, "candidatesTokenCount": 64 }
    }"#
}

/// Gemini response with no candidates — e.g. a fully filtered generation.
#[cfg(test)]
pub(crate) fn fixture_gemini_no_candidates_json() -> &'static str {
    r#"{
      "candidates": [],
      "promptFeedback": { "blockReason": "SAFETY" }
    }"#
}
