//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     Mux / Group
//!         → pattern.rs (join prefix onto "[METHOD ]path")
//!         → http::middleware::wrap (fold scope middleware around handler)
//!         → engine.rs (store composed handler under full pattern)
//!
//! Dispatch (per request):
//!     Mux::dispatch → engine.rs (path lookup, method lookup) → Handler
//! ```
//!
//! # Design Decisions
//! - Scopes never share middleware lists; branching copies the list
//! - Groups point at the root's engine, not at their parent
//! - Registration errors surface immediately; dispatch cannot fail

pub mod engine;
pub mod group;
pub mod mux;
pub mod pattern;
pub mod router;
mod scope;

pub use engine::{Engine, PathParams, RouteError};
pub use group::Group;
pub use mux::Mux;
pub use router::Router;
