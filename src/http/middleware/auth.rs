//! Bearer token guard.

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::http::handler::Handler;
use crate::http::middleware::Middleware;

/// Rejects requests with `401 Unauthorized` unless they carry
/// `Authorization: Bearer <token>`.
pub fn require_bearer(token: impl Into<String>) -> Middleware {
    let expected: Arc<str> = format!("Bearer {}", token.into()).into();

    Middleware::from_fn(move |req: Request, next: Handler| {
        let expected = expected.clone();
        async move {
            let authorized = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .is_some_and(|value| value == &*expected);

            if authorized {
                next.handle(req).await
            } else {
                warn!(path = %req.uri().path(), "Rejected unauthenticated request");
                unauthorized()
            }
        }
    })
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn guarded() -> Handler {
        require_bearer("s3cret").apply(Handler::new(|_req: Request| async { "secret data" }))
    }

    #[tokio::test]
    async fn test_missing_token() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let response = guarded().handle(req).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_token() {
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Bearer nope")
            .body(Body::empty())
            .unwrap();
        let response = guarded().handle(req).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token() {
        let req = Request::builder()
            .header(header::AUTHORIZATION, "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        let response = guarded().handle(req).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
