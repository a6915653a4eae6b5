/// HTTP endpoint for the flood risk service
///
/// Provides a simple REST API for the web frontend and other tools.
///
/// Endpoints:
/// - GET /geocode?city={name} - Resolve a city to coordinates
/// - GET /risk?lat={f}&lon={f} - Rainfall-based flood risk assessment
/// - GET /predict_flood?city={name} - River level prediction + safety advisory
/// - GET /board?limit={n} - List bulletin items, most recent first
/// - POST /board/request, POST /board/offer - Create a bulletin item
/// - GET /health - Service health check + capability report
///
/// The server accepts on a shared listener from a fixed pool of worker
/// threads; every worker owns its own HTTP client and (when the board
/// capability is up) its own database connection, so requests need no
/// cross-thread coordination.

use crate::board::{self, BulletinDraft, ItemKind};
use crate::config::{ApiKeys, ServiceConfig};
use crate::db;
use crate::ingest::{self, current, geocode, onecall};
use crate::model::ProviderError;
use crate::predict::{self, FittedLine};
use crate::registry::{CapabilityRegistry, CAP_BULLETIN_BOARD, CAP_LEVEL_PREDICTOR};
use crate::{advisory, risk};
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use threadpool::ThreadPool;
use tiny_http::{Method, Request, Server};

type JsonResponse = tiny_http::Response<std::io::Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Shared context
// ---------------------------------------------------------------------------

/// Read-only state shared by all request workers.
pub struct EndpointContext {
    pub config: ServiceConfig,
    pub keys: ApiKeys,
    pub predictor: Option<FittedLine>,
    pub registry: CapabilityRegistry,
}

/// Per-worker state: the shared context plus this worker's own clients.
struct Worker {
    ctx: Arc<EndpointContext>,
    http: reqwest::blocking::Client,
    board_db: Option<postgres::Client>,
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

/// Start the endpoint server on the specified port. Blocks forever.
pub fn start_endpoint_server(port: u16, ctx: EndpointContext) -> Result<(), String> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET  /geocode?city={{name}}");
    println!("   GET  /risk?lat={{f}}&lon={{f}}");
    println!("   GET  /predict_flood?city={{name}}");
    println!("   GET  /board?limit={{n}}");
    println!("   POST /board/request | /board/offer");
    println!("   GET  /health\n");

    let server = Arc::new(server);
    let ctx = Arc::new(ctx);
    let workers = ctx.config.server.workers.max(1);
    let pool = ThreadPool::new(workers);

    for worker_id in 0..workers {
        let server = Arc::clone(&server);
        let ctx = Arc::clone(&ctx);

        pool.execute(move || {
            let mut worker = match Worker::start(ctx) {
                Ok(w) => w,
                Err(e) => {
                    eprintln!("❌ Worker {} failed to start: {}", worker_id, e);
                    return;
                }
            };

            loop {
                match server.recv() {
                    Ok(request) => worker.handle(request),
                    Err(e) => {
                        eprintln!("Worker {} receive error: {}", worker_id, e);
                        return;
                    }
                }
            }
        });
    }

    // Workers loop forever; join only returns if the listener dies.
    pool.join();
    Ok(())
}

impl Worker {
    fn start(ctx: Arc<EndpointContext>) -> Result<Self, String> {
        let http = ingest::build_http_client().map_err(|e| e.to_string())?;

        // Each worker opens its own connection; postgres clients are not
        // shareable across threads.
        let board_db = if ctx.registry.is_ready(CAP_BULLETIN_BOARD) {
            match db::connect_with_validation() {
                Ok(client) => Some(client),
                Err(e) => {
                    eprintln!("⚠ Worker database connection failed: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Ok(Worker { ctx, http, board_db })
    }

    fn handle(&mut self, mut request: Request) {
        let url = request.url().to_string();
        let (path, params) = split_query(&url);
        let method = request.method().clone();

        let response = match (&method, path) {
            (Method::Get, "/health") => self.handle_health(),
            (Method::Get, "/geocode") => self.handle_geocode(&params),
            (Method::Get, "/risk") => self.handle_risk(&params),
            (Method::Get, "/predict_flood") => self.handle_predict_flood(&params),
            (Method::Get, "/board") => self.handle_board_list(&params),
            (Method::Post, "/board/request") => self.handle_board_post(&mut request, ItemKind::Request),
            (Method::Post, "/board/offer") => self.handle_board_post(&mut request, ItemKind::Offer),
            _ => create_response(
                404,
                serde_json::json!({
                    "error": "Not found",
                    "available_endpoints": [
                        "/health",
                        "/geocode?city={name}",
                        "/risk?lat={f}&lon={f}",
                        "/predict_flood?city={name}",
                        "/board?limit={n}",
                        "/board/request",
                        "/board/offer"
                    ]
                }),
            ),
        };

        if let Err(e) = request.respond(response) {
            eprintln!("Failed to send response: {}", e);
        }
    }

    // -- Handlers -----------------------------------------------------------

    fn handle_health(&self) -> JsonResponse {
        create_response(
            200,
            serde_json::json!({
                "status": "ok",
                "service": "floodrisk_service",
                "version": "0.1.0",
                "capabilities": self.ctx.registry.report()
            }),
        )
    }

    fn handle_geocode(&self, params: &HashMap<String, String>) -> JsonResponse {
        let city = match required_param(params, "city") {
            Ok(city) => city,
            Err(response) => return response,
        };

        match geocode::fetch_location(
            &self.http,
            &self.ctx.keys.openweather,
            &self.ctx.config.geocoding.country_code,
            city,
        ) {
            Ok(location) => match serde_json::to_value(&location) {
                Ok(json) => create_response(200, json),
                Err(e) => internal_error(&e.to_string()),
            },
            Err(e) => provider_error_response(&e),
        }
    }

    fn handle_risk(&self, params: &HashMap<String, String>) -> JsonResponse {
        let lat = match required_float_param(params, "lat") {
            Ok(v) => v,
            Err(response) => return response,
        };
        let lon = match required_float_param(params, "lon") {
            Ok(v) => v,
            Err(response) => return response,
        };

        match onecall::fetch_hourly_rain(&self.http, &self.ctx.keys.openweather, lat, lon) {
            Ok(hourly) => {
                let assessment = risk::score(&hourly);
                match serde_json::to_value(&assessment) {
                    Ok(json) => create_response(200, json),
                    Err(e) => internal_error(&e.to_string()),
                }
            }
            Err(e) => provider_error_response(&e),
        }
    }

    fn handle_predict_flood(&self, params: &HashMap<String, String>) -> JsonResponse {
        let city = match required_param(params, "city") {
            Ok(city) => city,
            Err(response) => return response,
        };

        let line = match self.ctx.predictor {
            Some(line) => line,
            None => {
                return create_response(
                    503,
                    serde_json::json!({
                        "error": "river level predictor unavailable: no trained model",
                        "capability": CAP_LEVEL_PREDICTOR
                    }),
                );
            }
        };

        let weather = match current::fetch_current(&self.http, &self.ctx.keys.openweather, city) {
            Ok(weather) => weather,
            Err(e) => return provider_error_response(&e),
        };

        let prediction = predict::predict_level(&line, weather.rain_1h);

        // Advisory failures degrade to explanatory text; they never fail
        // the prediction payload.
        let checklist =
            advisory::generate_checklist(&self.http, &self.ctx.keys.gemini, &weather, &prediction);

        create_response(
            200,
            serde_json::json!({
                "weather": weather,
                "predicted_level_m": prediction.predicted_level_m,
                "status": prediction.status,
                "advisory": checklist
            }),
        )
    }

    fn handle_board_list(&mut self, params: &HashMap<String, String>) -> JsonResponse {
        let limit = match params.get("limit") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return create_response(
                        400,
                        serde_json::json!({
                            "error": format!("limit must be a positive integer, got '{}'", raw)
                        }),
                    );
                }
            },
            None => self.ctx.config.board.default_limit,
        };

        let client = match self.board_db.as_mut() {
            Some(client) => client,
            None => return board_unavailable(),
        };

        match board::list_items(client, limit) {
            Ok(items) => match serde_json::to_value(&items) {
                Ok(json) => create_response(200, json),
                Err(e) => internal_error(&e.to_string()),
            },
            Err(e) => internal_error(&e.to_string()),
        }
    }

    fn handle_board_post(&mut self, request: &mut Request, kind: ItemKind) -> JsonResponse {
        let mut body = String::new();
        if let Err(e) = request.as_reader().read_to_string(&mut body) {
            return internal_error(&format!("failed to read request body: {}", e));
        }

        let draft: BulletinDraft = match serde_json::from_str(&body) {
            Ok(draft) => draft,
            Err(e) => {
                return create_response(
                    400,
                    serde_json::json!({ "error": format!("invalid request body: {}", e) }),
                );
            }
        };

        let max_details_len = self.ctx.config.board.max_details_len;
        let client = match self.board_db.as_mut() {
            Some(client) => client,
            None => return board_unavailable(),
        };

        match board::insert_item(client, kind, &draft, max_details_len) {
            Ok(item) => match serde_json::to_value(&item) {
                Ok(json) => create_response(201, json),
                Err(e) => internal_error(&e.to_string()),
            },
            Err(board::BoardError::InvalidItem(msg)) => {
                create_response(400, serde_json::json!({ "error": msg }))
            }
            Err(e) => internal_error(&e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Request parsing helpers
// ---------------------------------------------------------------------------

/// Split a request URL into its path and decoded query parameters.
///
/// Pairs without '=' are kept with an empty value; percent-encoded
/// names and values are decoded.
pub fn split_query(url: &str) -> (&str, HashMap<String, String>) {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => return (url, HashMap::new()),
    };

    let mut params = HashMap::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = urlencoding::decode(key).map(|k| k.into_owned()).unwrap_or_else(|_| key.to_string());
        let value = urlencoding::decode(value).map(|v| v.into_owned()).unwrap_or_else(|_| value.to_string());
        params.insert(key, value);
    }

    (path, params)
}

fn required_param<'a>(
    params: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, JsonResponse> {
    match params.get(name).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(create_response(
            400,
            serde_json::json!({ "error": format!("missing required query parameter: {}", name) }),
        )),
    }
}

fn required_float_param(
    params: &HashMap<String, String>,
    name: &str,
) -> Result<f64, JsonResponse> {
    let raw = required_param(params, name)?;
    raw.parse::<f64>().map_err(|_| {
        create_response(
            400,
            serde_json::json!({ "error": format!("{} must be a number, got '{}'", name, raw) }),
        )
    })
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Map a provider failure onto an HTTP status: missing cities are the
/// client's problem, upstream/transport failures are a bad gateway, and
/// parse failures are ours.
fn provider_error_response(error: &ProviderError) -> JsonResponse {
    let status = match error {
        ProviderError::NotFound(_) => 404,
        ProviderError::Upstream { .. } | ProviderError::Transport(_) => 502,
        ProviderError::Parse(_) => 500,
    };
    create_response(status, serde_json::json!({ "error": error.to_string() }))
}

fn board_unavailable() -> JsonResponse {
    create_response(
        503,
        serde_json::json!({
            "error": "bulletin board unavailable: no database connection",
            "capability": CAP_BULLETIN_BOARD
        }),
    )
}

fn internal_error(message: &str) -> JsonResponse {
    create_response(500, serde_json::json!({ "error": message }))
}

/// Create HTTP response with JSON body
fn create_response(status_code: u16, json: serde_json::Value) -> JsonResponse {
    let body = serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string());
    let bytes = body.into_bytes();

    tiny_http::Response::from_data(bytes)
        .with_status_code(tiny_http::StatusCode::from(status_code))
        .with_header(
            tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
        )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
