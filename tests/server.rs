//! End-to-end serving over TCP.

use std::time::Duration;

use axum::Json;
use serde_json::{json, Value};

use scoped_mux::{request_id, require_bearer, Mux, PathParams, Router, X_REQUEST_ID};

mod common;

fn demo_mux() -> Mux {
    let mut mux = Mux::new();
    mux.use_middleware([request_id(), common::tagging("root")])
        .unwrap();
    mux.handle_fn("GET /", || async { "Welcome!" }).unwrap();

    let api = mux.group("/api/v1").unwrap();
    api.handle_fn("GET /users/{id}", |params: PathParams| async move {
        Json(json!({ "id": params.get("id") }))
    })
    .unwrap();

    let mut admin = mux.group("/admin").unwrap();
    admin.use_middleware([require_bearer("s3cret")]).unwrap();
    let engine = mux.raw_engine().clone();
    admin
        .handle_fn("GET /routes", move || {
            let engine = engine.clone();
            async move { Json(engine.patterns()) }
        })
        .unwrap();

    mux
}

#[tokio::test]
async fn test_serves_composed_routes() {
    let (addr, shutdown) = common::start_server(demo_mux()).await;
    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let response = client.get(format!("{base}/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["x-trace"], "root");
    assert!(response.headers().contains_key(X_REQUEST_ID));
    assert_eq!(response.text().await.unwrap(), "Welcome!");

    let response = client
        .get(format!("{base}/api/v1/users/7"))
        .header(X_REQUEST_ID, "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()[X_REQUEST_ID], "req-123");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "id": "7" }));

    let response = client.get(format!("{base}/nope")).send().await.unwrap();
    assert_eq!(response.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn test_admin_group_requires_token() {
    let (addr, shutdown) = common::start_server(demo_mux()).await;
    let client = reqwest::Client::new();
    let url = format!("http://{addr}/admin/routes");

    let response = client.get(&url).send().await.unwrap();
    assert_eq!(response.status(), 401);

    let response = client.get(&url).bearer_auth("s3cret").send().await.unwrap();
    assert_eq!(response.status(), 200);
    let routes: Vec<String> = response.json().await.unwrap();
    assert_eq!(routes, ["GET /", "GET /api/v1/users/{id}", "GET /admin/routes"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_requests() {
    let (addr, shutdown) = common::start_server(demo_mux()).await;
    let client = reqwest::Client::new();

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = format!("http://{addr}/api/v1/users/{i}");
        handles.push(tokio::spawn(async move {
            let body: Value = client.get(url).send().await.unwrap().json().await.unwrap();
            assert_eq!(body["id"], i.to_string());
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_accepting() {
    let (addr, shutdown) = common::start_server(demo_mux()).await;
    let client = reqwest::Client::new();

    let response = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let result = reqwest::Client::new()
        .get(format!("http://{addr}/"))
        .timeout(Duration::from_secs(1))
        .send()
        .await;
    assert!(result.is_err());
}
