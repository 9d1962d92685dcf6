//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs policy, sequenced in main):
//!     Load config → construct container → build router → start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → stop accepting → drain (bounded) → unwind container
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → one blocking await in the main control path
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then subsystems, listener last
//! - Ordered shutdown: exact reverse, bounded by the drain deadline
//! - Teardown happens exactly once; later signals and drains are no-ops

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Coordinator, State};
pub use startup::fatal;
