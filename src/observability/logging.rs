//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Provide an access-log middleware
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` overrides the configured filter

use std::time::Instant;

use axum::extract::Request;
use tracing::info;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::http::handler::Handler;
use crate::http::middleware::{Middleware, RequestIdExt};

/// Install the global subscriber. `filter` applies when `RUST_LOG` is unset.
pub fn init_tracing(filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}

/// Middleware emitting one event per request with method, path, status
/// and latency. Place it after [`request_id`](crate::request_id) to get
/// the id in the event.
pub fn access_log() -> Middleware {
    Middleware::from_fn(|req: Request, next: Handler| async move {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let request_id = req.request_id().map(ToString::to_string);
        let start = Instant::now();

        let response = next.handle(req).await;

        info!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            latency_us = start.elapsed().as_micros() as u64,
            request_id = request_id.as_deref().unwrap_or("-"),
            "Request served"
        );
        response
    })
}
