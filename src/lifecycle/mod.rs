//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Build route tree → Bind listener → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     Signal received → Shutdown::trigger → Stop accepting → Drain → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any registration or config error aborts before serving
//! - Routes are complete before the listener starts

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
