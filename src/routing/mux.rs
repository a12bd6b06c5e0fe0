//! The root router.

use std::convert::Infallible;
use std::task::{Context, Poll};

use axum::extract::Request;
use axum::response::Response;
use futures_util::future::{BoxFuture, FutureExt};
use tower::Service;

use crate::error::Result;
use crate::http::handler::Handler;
use crate::http::middleware::Middleware;
use crate::routing::engine::Engine;
use crate::routing::group::Group;
use crate::routing::router::Router;
use crate::routing::scope::Scope;

/// HTTP request multiplexer with registration-time middleware.
///
/// Owns the matching engine. Routes registered on the mux itself use their
/// pattern verbatim; use [`Router::group`] for prefixed sub-trees.
///
/// ```
/// use scoped_mux::{Mux, Router};
///
/// let mut mux = Mux::new();
/// mux.use_middleware([scoped_mux::request_id()])?;
/// mux.handle_fn("GET /", || async { "Welcome!" })?;
///
/// let api = mux.group("/api/v1")?;
/// api.handle_fn("GET /status", || async { "OK" })?;
///
/// assert_eq!(mux.routes(), ["GET /", "GET /api/v1/status"]);
/// # Ok::<(), scoped_mux::Error>(())
/// ```
///
/// Clones share the route table and start from a copy of the middleware
/// list, like a group with no prefix.
#[derive(Debug, Clone)]
pub struct Mux {
    scope: Scope,
}

impl Mux {
    pub fn new() -> Self {
        Self {
            scope: Scope::root(Engine::new()),
        }
    }

    /// Serve one request. All middleware was applied at registration, so
    /// this is only the engine lookup.
    pub fn dispatch(&self, req: Request) -> BoxFuture<'static, Response> {
        self.scope.engine().dispatch(req)
    }

    /// The underlying engine.
    ///
    /// Handlers registered directly on it bypass every middleware added
    /// through [`Router::use_middleware`]. Meant for introspection,
    /// debugging and interop only.
    pub fn raw_engine(&self) -> &Engine {
        self.scope.engine()
    }

    /// Registered patterns, in registration order.
    pub fn routes(&self) -> Vec<String> {
        self.scope.engine().patterns()
    }
}

impl Default for Mux {
    fn default() -> Self {
        Self::new()
    }
}

impl Router for Mux {
    fn handle(&self, pattern: &str, handler: Handler) -> Result<()> {
        self.scope.register(pattern, handler)
    }

    fn use_middleware<I, M>(&mut self, middleware: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        self.scope.append(middleware)
    }

    fn group(&self, prefix: &str) -> Result<Group> {
        self.scope.branch(prefix).map(Group::new)
    }
}

impl Service<Request> for Mux {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, std::result::Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request) -> Self::Future {
        self.dispatch(req).map(Ok).boxed()
    }
}
