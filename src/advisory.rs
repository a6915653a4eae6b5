/// Safety checklist generation via the Gemini text API.
///
/// Builds a fixed-template situation prompt from the current weather and
/// the river level prediction, and asks the generateContent endpoint for
/// a resident-facing checklist:
///   https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent
///
/// Advisory failures are non-fatal: any error on this path degrades to
/// explanatory text in the normal response instead of failing the
/// request.

use crate::model::{FloodPrediction, FloodStatus, ProviderError, WeatherSnapshot};
use serde::{Deserialize, Serialize};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Generation model requested from the API.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

// ---------------------------------------------------------------------------
// Serde structures for the generateContent request/response
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

// ---------------------------------------------------------------------------
// URL and prompt construction
// ---------------------------------------------------------------------------

/// Builds the generateContent URL with the API key as a query parameter.
pub fn build_generate_url(api_key: &str) -> String {
    format!(
        "{}/{}:generateContent?key={}",
        GEMINI_BASE_URL, GEMINI_MODEL, api_key
    )
}

/// Builds the fixed situation-report prompt.
///
/// The template embeds the city, current rainfall, weather description,
/// the predicted level to two decimals, and the status, then asks for a
/// one-sentence summary and a five-step checklist with a tone contingent
/// on the status.
pub fn build_prompt(weather: &WeatherSnapshot, prediction: &FloodPrediction) -> String {
    format!(
        "You are an expert flood safety assistant.\n\
         \n\
         Live Situation Report for {city}:\n\
         - Current Rainfall: {rain} mm\n\
         - Weather Description: {description}\n\
         - Predicted River Level: {level:.2} meters\n\
         - Official Status: {status}\n\
         \n\
         Based on this, provide:\n\
         1. A brief situation summary (1 sentence).\n\
         2. A \"To-Do\" checklist of 5 actionable safety steps for residents RIGHT NOW.\n\
         3. If the status is \"FLOOD WARNING\", make the tone urgent. If \"SAFE\", make it educational.\n",
        city = weather.city,
        rain = weather.rain_1h,
        description = weather.description,
        level = prediction.predicted_level_m,
        status = prediction.status,
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Extracts the generated text from a generateContent response body.
///
/// # Errors
/// - `ProviderError::Parse` — malformed JSON, or a response with no
///   candidates / no text (e.g. a fully filtered generation).
pub fn parse_generate_response(json: &str) -> Result<String, ProviderError> {
    let response: GenerateResponse = serde_json::from_str(json)
        .map_err(|e| ProviderError::Parse(format!("Gemini JSON deserialization failed: {}", e)))?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ProviderError::Parse("Gemini response contained no text".to_string()))?;

    Ok(text)
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// One generateContent call. Same failure taxonomy as the weather
/// clients; the caller decides whether failures degrade or propagate.
fn request_checklist(
    http: &reqwest::blocking::Client,
    api_key: &str,
    prompt: &str,
) -> Result<String, ProviderError> {
    let url = build_generate_url(api_key);
    let request = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
    };

    let response = http
        .post(&url)
        .json(&request)
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

    parse_generate_response(&body)
}

/// Generate the safety checklist, degrading on failure.
///
/// Never returns an error: a failed generation yields a string that
/// describes the failure so the rest of the prediction payload still
/// reaches the caller.
pub fn generate_checklist(
    http: &reqwest::blocking::Client,
    api_key: &str,
    weather: &WeatherSnapshot,
    prediction: &FloodPrediction,
) -> String {
    let prompt = build_prompt(weather, prediction);

    match request_checklist(http, api_key, &prompt) {
        Ok(text) => text,
        Err(e) => format!("Error generating safety advisory: {}", e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
