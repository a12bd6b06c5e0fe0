//! scoped-mux demo server.
//!
//! # Architecture Overview
//!
//! ```text
//!   Startup                                   Per request
//!   ───────                                   ───────────
//!   config.toml ──▶ ServerConfig              TCP ──▶ axum::serve ──▶ timeout
//!                       │                                               │
//!                       ▼                                               ▼
//!   Mux ── use_middleware(request_id, access_log, metrics)        Mux::dispatch
//!    ├── "GET /"                                                        │
//!    ├── group("/api/v1") ── "GET /status", "GET /users/{id}"           ▼
//!    │      └── with(no_store) ── "POST /echo"                  composed handler
//!    └── group("/admin") + require_bearer ── "GET /routes"     (onion, prebuilt)
//! ```
//!
//! Every route is composed before the listener binds; nothing is wrapped
//! per request.

use std::path::PathBuf;

use axum::http::{header, HeaderValue};
use axum::Json;
use clap::Parser;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;

use scoped_mux::config::{load_config, ServerConfig};
use scoped_mux::lifecycle::signals;
use scoped_mux::observability::{access_log, init_metrics, init_tracing, record_metrics};
use scoped_mux::{request_id, require_bearer, HttpServer, Middleware, Mux, PathParams, Router, Shutdown};

#[derive(Parser)]
#[command(name = "scoped-mux")]
#[command(about = "Demo server for the scoped-mux routing layer", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the registered routes and exit.
    #[arg(long)]
    print_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    init_tracing(&config.observability.log_filter)?;
    tracing::info!("scoped-mux v{} starting", env!("CARGO_PKG_VERSION"));

    let mux = build_routes(&config)?;

    if cli.print_routes {
        for route in mux.routes() {
            println!("{route}");
        }
        return Ok(());
    }

    if config.observability.metrics_enabled {
        init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::trigger_on_ctrl_c(&shutdown);

    let server = HttpServer::new(config, mux);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn build_routes(config: &ServerConfig) -> scoped_mux::Result<Mux> {
    let mut mux = Mux::new();

    let observability = &config.observability;
    if observability.request_id {
        mux.use_middleware([request_id()])?;
    }
    if observability.access_log {
        mux.use_middleware([access_log()])?;
    }
    if observability.metrics_enabled {
        mux.use_middleware([record_metrics()])?;
    }

    mux.handle_fn("GET /", || async { "Welcome!" })?;

    let api = mux.group("/api/v1")?;
    api.handle_fn("GET /status", || async { "OK" })?;
    api.handle_fn("GET /users/{id}", |params: PathParams| async move {
        Json(json!({ "id": params.get("id") }))
    })?;

    let no_store = Middleware::layer(SetResponseHeaderLayer::overriding(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store"),
    ));
    api.with([no_store])?
        .handle_fn("POST /echo", |body: String| async move { body })?;

    if let Some(key) = &config.admin.api_key {
        let mut admin = mux.group("/admin")?;
        admin.use_middleware([require_bearer(key.clone())])?;

        let engine = mux.raw_engine().clone();
        admin.handle_fn("GET /routes", move || {
            let engine = engine.clone();
            async move { Json(engine.patterns()) }
        })?;
    }

    Ok(mux)
}
