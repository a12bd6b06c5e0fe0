//! Pattern-matching engine: the registration sink behind every scope.
//!
//! # Responsibilities
//! - Store fully composed handlers under `"[METHOD ]path"` patterns
//! - Resolve a request to a handler by path, then by method
//! - Reject duplicate, conflicting and malformed patterns at registration
//!
//! # Design Decisions
//! - Radix-tree path lookup via `matchit` (`{name}` captures, `{*rest}` catch-all)
//! - Patterns without a method match every method; a method-specific
//!   handler wins for its method
//! - `HEAD` falls back to `GET`
//! - No path match → 404, path match without method → 405 with `Allow`
//! - Copy-on-write table behind `ArcSwap`: dispatch takes a lock-free
//!   snapshot, registration builds a new table and swaps it in

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::task::{Context, Poll};

use arc_swap::ArcSwap;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::{self, BoxFuture, FutureExt};
use thiserror::Error;
use tower::Service;

use crate::http::handler::Handler;
use crate::routing::pattern::split_method_path;

/// Errors raised by the engine when a pattern cannot be registered.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("pattern {0:?} is already registered")]
    Duplicate(String),

    #[error("pattern {pattern:?} conflicts with existing route {with:?}")]
    Conflict { pattern: String, with: String },

    #[error("pattern {pattern:?} is malformed: {reason}")]
    Malformed { pattern: String, reason: String },
}

/// Path captures of the matched route, in pattern order.
///
/// Inserted into request extensions on dispatch and extractable in axum
/// handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    /// Value captured for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S> FromRequestParts<S> for PathParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<PathParams>().cloned().unwrap_or_default())
    }
}

/// Handlers registered under one path.
#[derive(Clone, Default)]
struct Endpoint {
    methods: Vec<(Method, Handler)>,
    any: Option<Handler>,
}

impl Endpoint {
    fn find(&self, method: &Method) -> Option<&Handler> {
        self.methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, handler)| handler)
    }

    fn lookup(&self, method: &Method) -> Option<&Handler> {
        self.find(method)
            .or_else(|| {
                if *method == Method::HEAD {
                    self.find(&Method::GET)
                } else {
                    None
                }
            })
            .or(self.any.as_ref())
    }

    fn allow(&self) -> String {
        let mut allowed: Vec<&str> = self.methods.iter().map(|(m, _)| m.as_str()).collect();
        if allowed.contains(&"GET") && !allowed.contains(&"HEAD") {
            allowed.push("HEAD");
        }
        allowed.join(", ")
    }
}

#[derive(Clone)]
struct RouteTable {
    paths: matchit::Router<usize>,
    endpoints: Vec<Endpoint>,
    index: HashMap<String, usize>,
    patterns: Vec<String>,
}

impl RouteTable {
    fn new() -> Self {
        Self {
            paths: matchit::Router::new(),
            endpoints: Vec::new(),
            index: HashMap::new(),
            patterns: Vec::new(),
        }
    }

    fn insert(&mut self, pattern: &str, handler: Handler) -> Result<(), RouteError> {
        let (method, path) = split_method_path(pattern);
        if !path.starts_with('/') {
            return Err(RouteError::Malformed {
                pattern: pattern.to_string(),
                reason: "path must start with '/'".to_string(),
            });
        }

        let slot = match self.index.get(path) {
            Some(&slot) => slot,
            None => {
                let slot = self.endpoints.len();
                self.paths
                    .insert(path, slot)
                    .map_err(|err| insert_error(pattern, err))?;
                self.endpoints.push(Endpoint::default());
                self.index.insert(path.to_string(), slot);
                slot
            }
        };

        let endpoint = &mut self.endpoints[slot];
        if method.is_empty() {
            if endpoint.any.is_some() {
                return Err(RouteError::Duplicate(pattern.to_string()));
            }
            endpoint.any = Some(handler);
        } else {
            let method = Method::from_bytes(method.as_bytes()).map_err(|err| RouteError::Malformed {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })?;
            if endpoint.find(&method).is_some() {
                return Err(RouteError::Duplicate(pattern.to_string()));
            }
            endpoint.methods.push((method, handler));
        }

        self.patterns.push(pattern.to_string());
        Ok(())
    }
}

fn insert_error(pattern: &str, err: matchit::InsertError) -> RouteError {
    match err {
        matchit::InsertError::Conflict { with } => RouteError::Conflict {
            pattern: pattern.to_string(),
            with,
        },
        other => RouteError::Malformed {
            pattern: pattern.to_string(),
            reason: other.to_string(),
        },
    }
}

/// Shared handle to the route table.
///
/// Cloning is cheap and every clone sees the same routes. Registering
/// directly on the engine bypasses all scope middleware.
#[derive(Clone)]
pub struct Engine {
    table: Arc<ArcSwap<RouteTable>>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            table: Arc::new(ArcSwap::from_pointee(RouteTable::new())),
        }
    }

    /// Register `handler` under `pattern` as-is.
    ///
    /// On error the table is left exactly as it was.
    pub fn register(&self, pattern: &str, handler: Handler) -> Result<(), RouteError> {
        let mut next = (**self.table.load()).clone();
        next.insert(pattern, handler)?;
        self.table.store(Arc::new(next));
        Ok(())
    }

    /// Registered patterns in registration order.
    pub fn patterns(&self) -> Vec<String> {
        self.table.load().patterns.clone()
    }

    /// Resolve and run the handler for `req`.
    pub fn dispatch(&self, mut req: Request) -> BoxFuture<'static, Response> {
        let table = self.table.load();

        let (slot, params) = match table.paths.at(req.uri().path()) {
            Ok(matched) => {
                let params: Vec<_> = matched
                    .params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                (*matched.value, PathParams(params))
            }
            Err(_) => return future::ready(not_found()).boxed(),
        };

        let endpoint = &table.endpoints[slot];
        match endpoint.lookup(req.method()) {
            Some(handler) => {
                if !params.is_empty() {
                    req.extensions_mut().insert(params);
                }
                handler.handle(req)
            }
            None => future::ready(method_not_allowed(endpoint)).boxed(),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("patterns", &self.table.load().patterns)
            .finish()
    }
}

impl Service<Request> for Engine {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        self.dispatch(req).map(Ok).boxed()
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}

fn method_not_allowed(endpoint: &Endpoint) -> Response {
    let mut response = (StatusCode::METHOD_NOT_ALLOWED, "405 method not allowed").into_response();
    if let Ok(allow) = HeaderValue::from_str(&endpoint.allow()) {
        response.headers_mut().insert(header::ALLOW, allow);
    }
    response
}
