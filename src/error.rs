//! Registration-time errors.
//!
//! Every error in this crate is raised synchronously by the registration call
//! that caused it. Dispatch never fails: an unmatched request is answered with
//! an ordinary 404/405 response by the engine.

use thiserror::Error;

use crate::routing::engine::RouteError;

/// Result alias used by the registration API.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a route tree.
#[derive(Debug, Error)]
pub enum Error {
    /// An absent middleware was passed to `use_middleware` or `with`.
    /// The scope's middleware list is left untouched.
    #[error("nil middleware at position {index}")]
    InvalidMiddleware { index: usize },

    /// A group prefix that is non-empty and does not start with `/`.
    #[error("group prefix {0:?} must be empty or start with '/'")]
    InvalidPrefix(String),

    /// Rejected by the matching engine, forwarded as-is.
    #[error(transparent)]
    Route(#[from] RouteError),
}
