//! mcn-daemon entry point.
//!
//! Thin: tracing, config, state, middleware, serve. Handlers live in
//! `routes.rs`, collaborator wiring in `boot.rs`.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use mcn_config::{
    config_paths_from_env, load_service_config, report_unused_keys, resolve_secrets,
    UnusedKeyPolicy,
};
use mcn_daemon::{boot, routes};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let paths = config_paths_from_env();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let (cfg, loaded) = load_service_config(&path_refs)
        .context("config load failed")?;

    let unused = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    for key in &unused.unused_leaf_pointers {
        warn!(key = %key, "unused config key");
    }
    info!(layers = paths.len(), config_hash = %loaded.config_hash, "config loaded");

    let secrets = resolve_secrets(&cfg);
    let shared = Arc::new(boot::build_state(&cfg, &secrets).await?);

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let addr = cfg.socket_addr()?;
    info!("mcn-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c handler failed");
    }
    info!("shutdown requested");
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(tower_http::cors::Any)
}
