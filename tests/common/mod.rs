//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::Request;
use axum::response::Response;
use tokio::net::TcpListener;

use scoped_mux::config::ServerConfig;
use scoped_mux::{Handler, HttpServer, Middleware, Mux, Shutdown};

/// Ordered log of middleware and handler events.
pub type Record = Arc<Mutex<Vec<String>>>;

pub fn record() -> Record {
    Arc::new(Mutex::new(Vec::new()))
}

/// Take and clear everything recorded so far.
pub fn drain(record: &Record) -> Vec<String> {
    std::mem::take(&mut *record.lock().unwrap())
}

/// Middleware that logs `name:enter` before and `name:exit` after the
/// next handler.
pub fn recording(name: &'static str, record: &Record) -> Middleware {
    let record = record.clone();
    Middleware::from_fn(move |req, next: Handler| {
        let record = record.clone();
        async move {
            record.lock().unwrap().push(format!("{name}:enter"));
            let response = next.handle(req).await;
            record.lock().unwrap().push(format!("{name}:exit"));
            response
        }
    })
}

/// Middleware that appends `value` to the `x-trace` response header.
pub fn tagging(value: &'static str) -> Middleware {
    Middleware::from_fn(move |req, next: Handler| async move {
        let mut response = next.handle(req).await;
        response
            .headers_mut()
            .append("x-trace", value.parse().unwrap());
        response
    })
}

/// Handler that logs `handler:name` and answers with `name`.
pub fn recorded_handler(name: &'static str, record: &Record) -> Handler {
    let record = record.clone();
    Handler::new(move |_req| {
        record.lock().unwrap().push(format!("handler:{name}"));
        async move { name }
    })
}

pub fn get(path: &str) -> Request {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

pub fn request(method: &str, path: &str) -> Request {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Values of every `x-trace` header, in order.
pub fn trace_header(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all("x-trace")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// Serve `mux` on an ephemeral port. Returns the bound address and the
/// shutdown handle.
pub async fn start_server(mux: Mux) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = ServerConfig::default();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, mux);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    (addr, shutdown)
}
