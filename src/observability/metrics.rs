//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mux_requests_total` (counter): requests by method, status
//! - `mux_request_duration_seconds` (histogram): latency by method
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter serves its own listener, separate from the app

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::Request;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::http::handler::Handler;
use crate::http::middleware::Middleware;

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one served request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "mux_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("mux_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Middleware recording request count and latency.
pub fn record_metrics() -> Middleware {
    Middleware::from_fn(|req: Request, next: Handler| async move {
        let method = req.method().clone();
        let start = Instant::now();

        let response = next.handle(req).await;

        record_request(method.as_str(), response.status().as_u16(), start);
        response
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_record_metrics_without_recorder() {
        let handler = record_metrics().apply(Handler::new(|_req: Request| async { StatusCode::NO_CONTENT }));
        let req = Request::builder().body(Body::empty()).unwrap();

        let response = handler.handle(req).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
