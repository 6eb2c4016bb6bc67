/**
 * GATENET SANDBOX - Point d'entrée du serveur de diagnostics
 *
 * RÔLE : Bootstrap : .env, logging, config, resolver, router HTTP.
 * UTILITÉ : Backend des bacs à sable de documentation et des démos UI.
 */

use anyhow::{Context, Result};
use gatenet_sandbox::config::load_config;
use gatenet_sandbox::http::{build_router, AppState};
use gatenet_sandbox::resolver::{LayeredResolver, SharedResolver, StaticResolver, SystemResolver};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatenet_sandbox=info,tower_http=info".into()),
        )
        .init();

    let cfg = load_config().await;

    // table statique d'abord, puis le résolveur système borné par timeout
    let overrides = StaticResolver::from_config(&cfg.dns.static_hosts);
    info!(static_hosts = overrides.len(), dns_timeout_ms = cfg.dns.timeout_ms, "resolver prêt");
    let system: SharedResolver = Arc::new(SystemResolver::new(Duration::from_millis(cfg.dns.timeout_ms)));
    let resolver: SharedResolver = Arc::new(LayeredResolver::new(overrides, system));

    let addr = format!("{}:{}", cfg.bind_addr, cfg.port);
    let app = build_router(AppState::new(cfg, resolver));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(addr = %addr, version = gatenet_sandbox::health::VERSION, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serveur HTTP")?;

    info!("arrêt propre");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("ctrl_c handler: {e}");
        std::future::pending::<()>().await;
    }
}
