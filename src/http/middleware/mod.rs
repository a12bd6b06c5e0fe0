//! Middleware composition.
//!
//! # Data Flow
//! ```text
//! use_middleware(A, B, C) + handle(H)
//!     → wrap(H, [A, B, C])        (folded once, at registration)
//!     → A(B(C(H)))                (single composed Handler)
//!
//! Request: A:enter → B:enter → C:enter → H → C:exit → B:exit → A:exit
//! ```
//!
//! # Design Decisions
//! - All composition happens at registration; serving only calls the result
//! - Every accumulation path (use, group, with, chain) reduces to `wrap`
//! - `tower` layers adapt into middleware, so `tower-http` stacks drop in

pub mod auth;
pub mod request_id;

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::extract::Request;
use axum::response::IntoResponse;
use tower::{Layer, Service};

use crate::http::handler::Handler;

pub use auth::require_bearer;
pub use request_id::{request_id, RequestId, RequestIdExt, X_REQUEST_ID};

type MiddlewareFn = dyn Fn(Handler) -> Handler + Send + Sync;

/// A handler transformation: given the next handler, returns a handler that
/// may run logic before and after delegating to it.
#[derive(Clone)]
pub struct Middleware(Arc<MiddlewareFn>);

impl Middleware {
    /// Build middleware from a `Handler -> Handler` function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Build middleware from an async function receiving the request and the
    /// next handler. Not calling `next` short-circuits the chain.
    ///
    /// ```
    /// use scoped_mux::{Handler, Middleware};
    ///
    /// let server_header = Middleware::from_fn(|req, next: Handler| async move {
    ///     let mut response = next.handle(req).await;
    ///     response.headers_mut().insert("server", "scoped-mux".parse().unwrap());
    ///     response
    /// });
    /// ```
    pub fn from_fn<F, Fut, R>(f: F) -> Self
    where
        F: Fn(Request, Handler) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let f = Arc::new(f);
        Self::new(move |next| {
            let f = f.clone();
            Handler::new(move |req| f(req, next.clone()))
        })
    }

    /// Adapt a `tower` layer. The layered service must be infallible.
    pub fn layer<L>(layer: L) -> Self
    where
        L: Layer<Handler> + Send + Sync + 'static,
        L::Service: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self::new(move |next| Handler::from_service(layer.layer(next)))
    }

    /// Wrap `next` in this middleware.
    pub fn apply(&self, next: Handler) -> Handler {
        (self.0)(next)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

/// Folds `middleware` around `handler` so the first element is outermost.
///
/// Iterates from last to first: `C` wraps `H`, `B` wraps that, `A` wraps
/// the result. An empty slice returns the handler unchanged.
pub fn wrap(handler: Handler, middleware: &[Middleware]) -> Handler {
    middleware
        .iter()
        .rev()
        .fold(handler, |next, mw| mw.apply(next))
}

/// Precomposes middleware into a single reusable unit.
///
/// `chain([A, B, C]).apply(h)` behaves exactly like `wrap(h, &[A, B, C])`.
pub fn chain<I>(middleware: I) -> Middleware
where
    I: IntoIterator<Item = Middleware>,
{
    let stack: Arc<[Middleware]> = middleware.into_iter().collect();
    Middleware::new(move |next| wrap(next, &stack))
}
