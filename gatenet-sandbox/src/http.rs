/**
 * API REST GATENET - Surface HTTP du sandbox de diagnostics
 *
 * RÔLE :
 * Expose les générateurs simulés (ping, traceroute, port scan) et la
 * résolution DNS réelle sous /api, plus le dashboard statique.
 *
 * FONCTIONNEMENT :
 * - Serveur Axum, toutes les routes en GET
 * - Enveloppe uniforme {ok, result|hops|error}, toujours HTTP 200 :
 *   le client branche sur `ok`, jamais sur le statut transport
 * - Délai artificiel avant chaque simulation (config simulation.delay_ms)
 * - Une source aléatoire par requête, aucun état mutable partagé
 * - CORS permissif pour l'intégration en iframe
 * - Query string lue en paires brutes : aucun rejet axum, clé répétée = première valeur
 */

use crate::config::SandboxConfig;
use crate::error::{DiagnosticError, GENERIC_FAILURE};
use crate::health::{HealthReport, HealthTracker};
use crate::models::{DiagnosticQuery, DnsLookupResult, Hop, PingResult, PortScanResult};
use crate::resolver::{dns_lookup, SharedResolver};
use crate::sim::{self, ping, PortScanPolicy};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

const INVALID_QUERY: &str = "Invalid query string";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SandboxConfig>,
    pub resolver: SharedResolver,
    pub health: HealthTracker,
}

impl AppState {
    pub fn new(config: SandboxConfig, resolver: SharedResolver) -> Self {
        Self { config: Arc::new(config), resolver, health: HealthTracker::new() }
    }
}

pub fn build_router(app_state: AppState) -> Router {
    let static_dir = Path::new(&app_state.config.static_dir).to_path_buf();

    Router::new()
        .route("/api/ping", get(api_ping))
        .route("/api/traceroute", get(api_traceroute))
        .route("/api/port_scan", get(api_port_scan))
        .route("/api/dns_lookup", get(api_dns_lookup))
        .route("/api/health", get(api_health))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(panic_envelope))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Convertit le résultat d'un générateur en enveloppe {ok, <key>|error}
fn envelope<T: Serialize>(key: &str, outcome: Result<T, DiagnosticError>) -> Json<Value> {
    let body = match outcome.and_then(|value| {
        serde_json::to_value(value).map_err(|e| DiagnosticError::Internal(e.to_string()))
    }) {
        Ok(value) => json!({ "ok": true, key: value }),
        Err(e) => {
            if let DiagnosticError::Internal(detail) = &e {
                error!("request failed: {detail}");
            }
            json!({ "ok": false, "error": e.public_message() })
        }
    };
    Json(body)
}

fn panic_envelope(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("handler panicked: {detail}");
    (StatusCode::OK, Json(json!({ "ok": false, "error": GENERIC_FAILURE }))).into_response()
}

/// Paires brutes de la query string, jamais rejetées par axum
type RawPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

fn diagnostic_query(raw: RawPairs) -> Result<DiagnosticQuery, DiagnosticError> {
    match raw {
        Ok(Query(pairs)) => Ok(DiagnosticQuery::from_pairs(pairs)),
        Err(rejection) => {
            warn!("query string illisible: {rejection}");
            Err(DiagnosticError::InvalidParameter(INVALID_QUERY.to_string()))
        }
    }
}

fn require_host(q: &DiagnosticQuery) -> Result<String, DiagnosticError> {
    match q.host.as_deref().map(str::trim) {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(DiagnosticError::missing("host")),
    }
}

fn parse_count(raw: Option<&str>) -> Result<u32, DiagnosticError> {
    let Some(raw) = raw else { return Ok(ping::DEFAULT_COUNT) };
    match raw.trim().parse::<u32>() {
        Ok(count) if (ping::MIN_COUNT..=ping::MAX_COUNT).contains(&count) => Ok(count),
        _ => {
            warn!(count = %raw, "count rejeté");
            Err(DiagnosticError::InvalidParameter(format!(
                "count must be an integer between {} and {}",
                ping::MIN_COUNT,
                ping::MAX_COUNT
            )))
        }
    }
}

async fn simulated_delay(cfg: &SandboxConfig) {
    if cfg.simulation.delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(cfg.simulation.delay_ms)).await;
    }
}

// GET /api/ping?host=..&count=..
async fn api_ping(State(app): State<AppState>, raw: RawPairs) -> Json<Value> {
    envelope("result", run_ping(&app, raw).await)
}

async fn run_ping(app: &AppState, raw: RawPairs) -> Result<PingResult, DiagnosticError> {
    let q = diagnostic_query(raw)?;
    let host = require_host(&q)?;
    let count = parse_count(q.count.as_deref())?;
    simulated_delay(&app.config).await;
    let mut rng = sim::request_rng(app.config.simulation.rng_seed);
    sim::simulate_ping(&mut rng, &host, count, app.config.simulation.ping_failure_probability)
}

// GET /api/traceroute?host=..
async fn api_traceroute(State(app): State<AppState>, raw: RawPairs) -> Json<Value> {
    envelope("hops", run_traceroute(&app, raw).await)
}

async fn run_traceroute(app: &AppState, raw: RawPairs) -> Result<Vec<Hop>, DiagnosticError> {
    let host = require_host(&diagnostic_query(raw)?)?;
    simulated_delay(&app.config).await;
    let mut rng = sim::request_rng(app.config.simulation.rng_seed);
    sim::simulate_traceroute(&mut rng, app.resolver.as_ref(), &host).await
}

// GET /api/port_scan?host=..&ports=80,443
async fn api_port_scan(State(app): State<AppState>, raw: RawPairs) -> Json<Value> {
    envelope("result", run_port_scan(&app, raw).await)
}

async fn run_port_scan(app: &AppState, raw: RawPairs) -> Result<PortScanResult, DiagnosticError> {
    let q = diagnostic_query(raw)?;
    let host = require_host(&q)?;
    let policy = PortScanPolicy::from(&app.config.port_scan);
    let spec = q.ports.as_deref().unwrap_or(&app.config.port_scan.default_ports);
    let ports = sim::parse_ports(spec, policy.max_ports)?;
    simulated_delay(&app.config).await;
    let mut rng = sim::request_rng(app.config.simulation.rng_seed);
    Ok(sim::simulate_port_scan(&mut rng, &host, &ports, &policy))
}

// GET /api/dns_lookup?host=..
async fn api_dns_lookup(State(app): State<AppState>, raw: RawPairs) -> Json<Value> {
    envelope("result", run_dns_lookup(&app, raw).await)
}

async fn run_dns_lookup(app: &AppState, raw: RawPairs) -> Result<DnsLookupResult, DiagnosticError> {
    let host = require_host(&diagnostic_query(raw)?)?;
    dns_lookup(app.resolver.as_ref(), &host).await
}

// GET /api/health
async fn api_health(State(app): State<AppState>) -> Json<HealthReport> {
    Json(app.health.report())
}
