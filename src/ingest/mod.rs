/// Upstream API clients.
///
/// Each provider endpoint gets its own file: `geocode` and `onecall` and
/// `current` all talk to OpenWeather but have distinct URL shapes and
/// response envelopes. `fixtures` holds representative response payloads
/// for the parsers' tests.

pub mod current;
pub mod fixtures;
pub mod geocode;
pub mod onecall;

use crate::model::ProviderError;
use std::time::Duration;

/// Fixed per-call network timeout, in seconds. Applies to every outbound
/// request; there is no retry on any external call.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Build the shared blocking HTTP client with the fixed per-call timeout.
pub fn build_http_client() -> Result<reqwest::blocking::Client, ProviderError> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {}", e)))
}
