/// floodrisk_service: rainfall-based flood risk assessment and community aid board.
///
/// # Module structure
///
/// ```text
/// floodrisk_service
/// ├── model       — shared data types (Location, WeatherSnapshot, RiskAssessment, ProviderError, …)
/// ├── config      — service.toml loader + API key loading from the environment
/// ├── db          — PostgreSQL connection and board schema validation
/// ├── board       — community bulletin board (aid requests/offers) storage
/// ├── ingest
/// │   ├── geocode — OpenWeather direct geocoding: URL construction + JSON parsing
/// │   ├── onecall — OpenWeather One Call API: hourly rainfall forecast retrieval
/// │   ├── current — OpenWeather current conditions API client
/// │   └── fixtures (test only) — representative API response payloads
/// ├── risk        — rainfall-window flood risk scoring (score, level, alerts)
/// ├── predict     — river level regression (offline OLS training + flood stage classification)
/// ├── advisory    — safety checklist generation via the Gemini text API
/// ├── registry    — capability registry for optional subsystems (predictor, board)
/// └── endpoint    — HTTP API served from a worker thread pool
/// ```

/// Public modules
pub mod advisory;
pub mod board;
pub mod config;
pub mod db;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod predict;
pub mod registry;
pub mod risk;
