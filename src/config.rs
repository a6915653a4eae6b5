/// Service configuration loader - parses service.toml and the environment
///
/// Separates tunable service settings (bind port, geocoding country scope,
/// board listing limits, training data paths) from code, and loads the
/// required API keys from the environment with fail-fast validation.

use serde::Deserialize;
use std::env;
use std::fs;

// ---------------------------------------------------------------------------
// service.toml
// ---------------------------------------------------------------------------

/// Root service configuration loaded from service.toml
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub geocoding: GeocodingConfig,
    pub board: BoardConfig,
    pub training: TrainingConfig,
}

/// HTTP endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Number of request worker threads; each worker owns its own
    /// database and HTTP client connections.
    pub workers: usize,
}

/// Geocoding scope settings
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingConfig {
    /// ISO 3166 country code appended to every geocoding query, scoping
    /// results to a single country.
    pub country_code: String,
}

/// Bulletin board settings
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Default listing size when the request omits ?limit=
    pub default_limit: i64,
    /// Maximum accepted length of the free-text details field
    pub max_details_len: usize,
}

/// Historical training data for the river level regression
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    pub rainfall_csv: String,
    pub river_level_csv: String,
}

/// Loads service configuration from the service.toml file.
///
/// # Panics
/// Panics if the configuration file is missing, malformed, or contains
/// invalid data. This is intentional — the service cannot operate without
/// valid settings.
///
/// # File Location
/// Expects `service.toml` in the current working directory (project root
/// when running via `cargo run`).
pub fn load_config() -> ServiceConfig {
    let config_path = "service.toml";

    let contents = fs::read_to_string(config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path, e));

    toml::from_str(&contents)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {}", config_path, e))
}

// ---------------------------------------------------------------------------
// API keys
// ---------------------------------------------------------------------------

/// Required third-party API keys, read once at process start.
///
/// Construction fails when either key is absent, so a misconfigured
/// deployment dies at startup rather than on the first request.
#[derive(Debug, Clone)]
pub struct ApiKeys {
    pub openweather: String,
    pub gemini: String,
}

/// Configuration validation error
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// A required secret is not present in the environment
    MissingSecret(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingSecret(name) => {
                write!(f, "{} environment variable not set.\n\n", name)?;
                write!(f, "  Required Setup:\n")?;
                write!(f, "  1. Copy .env.example to .env: cp .env.example .env\n")?;
                write!(f, "  2. Edit .env and set {}=<your key>\n\n", name)?;
                write!(f, "  OPENWEATHER_API_KEY: https://openweathermap.org/api\n")?;
                write!(f, "  GEMINI_API_KEY:      https://aistudio.google.com/apikey")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ApiKeys {
    /// Load both keys from the environment (reading .env if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_values(
            env::var("OPENWEATHER_API_KEY").ok(),
            env::var("GEMINI_API_KEY").ok(),
        )
    }

    /// Validate raw key values. A set-but-empty variable counts as missing.
    pub fn from_values(
        openweather: Option<String>,
        gemini: Option<String>,
    ) -> Result<Self, ConfigError> {
        let openweather = openweather
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingSecret("OPENWEATHER_API_KEY"))?;
        let gemini = gemini
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingSecret("GEMINI_API_KEY"))?;

        Ok(ApiKeys { openweather, gemini })
    }
}
