//! Request ID propagation.
//!
//! # Responsibilities
//! - Reuse an incoming `x-request-id` or generate a UUID v4
//! - Expose the id to inner handlers through request extensions
//! - Echo the id on the response for correlation
//!
//! # Design Decisions
//! - Register it first so every later layer and log line can see the id

use std::fmt;

use axum::extract::Request;
use axum::http::HeaderValue;
use uuid::Uuid;

use crate::http::handler::Handler;
use crate::http::middleware::Middleware;

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Identifier attached to each request by [`request_id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access to the [`RequestId`] stored on a request.
pub trait RequestIdExt {
    fn request_id(&self) -> Option<&RequestId>;
}

impl<B> RequestIdExt for axum::http::Request<B> {
    fn request_id(&self) -> Option<&RequestId> {
        self.extensions().get::<RequestId>()
    }
}

/// Middleware assigning a [`RequestId`] to every request.
pub fn request_id() -> Middleware {
    Middleware::from_fn(|mut req: Request, next: Handler| async move {
        let incoming = req
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| RequestId(v.to_string()));
        let id = incoming.unwrap_or_default();

        let header = HeaderValue::from_str(id.as_str()).ok();
        if let Some(value) = &header {
            req.headers_mut().insert(X_REQUEST_ID, value.clone());
        }
        req.extensions_mut().insert(id);

        let mut response = next.handle(req).await;
        if let Some(value) = header {
            response.headers_mut().insert(X_REQUEST_ID, value);
        }
        response
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};

    fn echo_id() -> Handler {
        Handler::new(|req: Request| async move {
            req.request_id().map(ToString::to_string).unwrap_or_default()
        })
    }

    #[tokio::test]
    async fn test_generates_id() {
        let handler = request_id().apply(echo_id());
        let req = Request::builder().body(Body::empty()).unwrap();

        let response = handler.handle(req).await;
        let header = response.headers()[X_REQUEST_ID].to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&header).is_ok());

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, header.as_bytes());
    }

    #[tokio::test]
    async fn test_preserves_incoming_id() {
        let handler = request_id().apply(echo_id());
        let req = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();

        let response = handler.handle(req).await;
        assert_eq!(response.headers()[X_REQUEST_ID], "abc-123");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }
}
