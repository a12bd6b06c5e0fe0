//! The registration API shared by [`Mux`](crate::Mux) and [`Group`].
//!
//! # Design Decisions
//! - One trait, two implementors: code that registers routes can take
//!   `&mut impl Router` and work on the root or any group
//! - Both implementors delegate to the same internal scope helpers, so the
//!   join and fold rules cannot drift apart

use crate::error::Result;
use crate::http::handler::Handler;
use crate::http::middleware::Middleware;
use crate::routing::group::Group;

/// Route registration, middleware accumulation and sub-scope creation.
///
/// Registration is not thread-safe: build the whole tree before serving.
pub trait Router {
    /// Register `handler` under `pattern` (`"[METHOD ]path"`).
    ///
    /// The handler is wrapped with the middleware this scope holds right
    /// now; middleware added later does not reach it. Engine errors
    /// (duplicate or malformed patterns) are returned as
    /// [`Error::Route`](crate::Error::Route).
    fn handle(&self, pattern: &str, handler: Handler) -> Result<()>;

    /// Register an axum handler (any async fn whose arguments are
    /// extractors) under `pattern`.
    fn handle_fn<H, T>(&self, pattern: &str, handler: H) -> Result<()>
    where
        H: axum::handler::Handler<T, ()>,
        T: 'static,
    {
        self.handle(pattern, Handler::from_axum(handler))
    }

    /// Append middleware to this scope, in order.
    ///
    /// Accepts plain [`Middleware`] values or `Option<Middleware>`. If any
    /// element is `None` the call fails with
    /// [`Error::InvalidMiddleware`](crate::Error::InvalidMiddleware) and
    /// nothing is appended. Only routes registered afterwards on this exact
    /// scope are affected.
    fn use_middleware<I, M>(&mut self, middleware: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>;

    /// Create a sub-scope whose prefix extends this one.
    ///
    /// The group starts with a copy of this scope's current middleware.
    /// Later changes to either list are invisible to the other. `prefix`
    /// must be empty or start with `/`, otherwise
    /// [`Error::InvalidPrefix`](crate::Error::InvalidPrefix).
    fn group(&self, prefix: &str) -> Result<Group>;

    /// A throwaway scope with the same prefix plus `middleware`, for
    /// applying middleware to one or a few routes.
    ///
    /// ```
    /// use scoped_mux::{require_bearer, Mux, Router};
    ///
    /// let mux = Mux::new();
    /// mux.with([require_bearer("token")])?
    ///     .handle_fn("GET /admin", || async { "admin" })?;
    /// # Ok::<(), scoped_mux::Error>(())
    /// ```
    fn with<I, M>(&self, middleware: I) -> Result<Group>
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        let mut group = self.group("")?;
        group.use_middleware(middleware)?;
        Ok(group)
    }
}
