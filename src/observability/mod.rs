//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration:
//!     routing → tracing debug events (route registered, group created)
//!
//! Per request (opt-in middleware):
//!     access_log()     → tracing info event
//!     record_metrics() → counters, histograms → Prometheus scrape
//! ```
//!
//! # Design Decisions
//! - Observability is middleware like anything else; nothing is implicit
//! - Request ID flows through the access log when registered before it

pub mod logging;
pub mod metrics;

pub use self::logging::{access_log, init_tracing};
pub use self::metrics::{init_metrics, record_metrics};
