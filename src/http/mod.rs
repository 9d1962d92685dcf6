//! HTTP layer: router construction, handlers, request middleware.
//!
//! The lifecycle orchestrator consumes this module through one call —
//! [`router::build`] — invoked after container construction and before the
//! listener starts. Everything request-scoped (handlers, pagination,
//! request IDs) lives here, outside the lifecycle core.

pub mod handlers;
pub mod pager;
pub mod request;
pub mod router;

pub use router::{build, RouterError};
