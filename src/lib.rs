//! Registration-time middleware composition for HTTP routing.
//!
//! A [`Mux`] folds its middleware around every handler at registration, in
//! onion order: for `use_middleware([A, B, C])` a request runs
//! `A → B → C → handler → C → B → A`. [`Group`]s add path prefixes and take
//! a copy of their parent's middleware, so later changes never leak between
//! scopes. Serving is a plain table lookup.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::ServerConfig;
pub use error::{Error, Result};
pub use http::middleware::{request_id, require_bearer, RequestId, RequestIdExt, X_REQUEST_ID};
pub use http::{chain, wrap, Handler, HttpServer, Middleware};
pub use lifecycle::Shutdown;
pub use observability::{access_log, record_metrics};
pub use routing::{Engine, Group, Mux, PathParams, RouteError, Router};
