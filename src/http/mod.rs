//! HTTP handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum::serve, timeout)
//!     → routing::Mux (engine lookup)
//!     → composed Handler (middleware.rs onion → handler.rs)
//!     → Response to client
//! ```

pub mod handler;
pub mod middleware;
pub mod server;

pub use axum::extract::Request;
pub use axum::response::Response;
pub use handler::Handler;
pub use middleware::{chain, wrap, Middleware};
pub use server::HttpServer;
