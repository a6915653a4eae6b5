//! Flood Risk Assessment Service - Main Entry Point
//!
//! A backend that:
//! 1. Resolves city names to coordinates (OpenWeather geocoding)
//! 2. Scores flood risk from the hourly rainfall forecast
//! 3. Predicts river levels with a regression trained from historical CSVs
//! 4. Generates resident safety checklists via the Gemini text API
//! 5. Hosts a community bulletin board for aid requests and offers
//!
//! The predictor and the bulletin board are optional capabilities: their
//! startup failures are captured in the capability registry and reported,
//! but never prevent the core risk endpoints from serving.
//!
//! Usage:
//!   cargo run --release                 # Serve on the configured port
//!   cargo run --release -- --port 8080  # Override the port
//!
//! Environment:
//!   OPENWEATHER_API_KEY - weather + geocoding provider key (required)
//!   GEMINI_API_KEY      - text generation provider key (required)
//!   DATABASE_URL        - PostgreSQL connection string (board capability)

use floodrisk_service::config::{self, ApiKeys};
use floodrisk_service::endpoint::{self, EndpointContext};
use floodrisk_service::predict::training;
use floodrisk_service::registry::{CapabilityRegistry, CAP_BULLETIN_BOARD, CAP_LEVEL_PREDICTOR};
use floodrisk_service::db;
use std::env;

fn main() {
    println!("🌊 Flood Risk Assessment Service");
    println!("=================================\n");

    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();
    let mut port_override: Option<u16> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                if i + 1 < args.len() {
                    port_override = args[i + 1].parse().ok();
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--port PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    // Required secrets first: a deployment without keys dies here, not on
    // the first request.
    println!("🔑 Loading API keys...");
    let keys = match ApiKeys::from_env() {
        Ok(keys) => keys,
        Err(e) => {
            eprintln!("\n❌ {}\n", e);
            std::process::exit(1);
        }
    };
    println!("✓ API keys loaded\n");

    // Service settings
    let config = config::load_config();
    let port = port_override.unwrap_or(config.server.port);

    // Optional capabilities: each initialization is isolated — a failure
    // is recorded and reported, never fatal.
    println!("🔌 Initializing capabilities...");
    let mut registry = CapabilityRegistry::new();

    let predictor = match training::train_from_files(
        &config.training.rainfall_csv,
        &config.training.river_level_csv,
    ) {
        Ok(line) => {
            registry.record_success(
                CAP_LEVEL_PREDICTOR,
                format!("level = {:.4} * rain + {:.4}", line.slope, line.intercept),
            );
            Some(line)
        }
        Err(e) => {
            registry.record_failure(CAP_LEVEL_PREDICTOR, e.to_string());
            None
        }
    };

    match db::connect_and_verify(&["board"]) {
        Ok(_client) => {
            // Startup probe only; each endpoint worker opens its own
            // connection.
            registry.record_success(CAP_BULLETIN_BOARD, "database reachable, board schema present");
        }
        Err(e) => {
            registry.record_failure(CAP_BULLETIN_BOARD, e.to_string());
        }
    }

    for capability in registry.iter() {
        if capability.ready {
            println!("   ✓ {} — {}", capability.name, capability.detail);
        } else {
            eprintln!("   ✗ {} — {} (continuing without it)", capability.name, capability.detail);
        }
    }
    println!();

    // Serve forever
    println!("🚀 Starting HTTP endpoint server...");
    println!("   Workers: {}", config.server.workers.max(1));
    println!("   Press Ctrl+C to stop\n");

    let ctx = EndpointContext {
        config,
        keys,
        predictor,
        registry,
    };

    if let Err(e) = endpoint::start_endpoint_server(port, ctx) {
        eprintln!("\n❌ Endpoint server error: {}\n", e);
        std::process::exit(1);
    }
}
