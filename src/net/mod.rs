//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! start:
//!     tls.rs (load material, only if enabled)
//!     → listener.rs (bind, spawn accept loop)
//!     → RunningHandle
//!
//! stop:
//!     stop accepting → drain in-flight (bounded) → force-close → stopped
//! ```
//!
//! # Design Decisions
//! - TLS material is loaded before bind; a bad config never opens a socket
//! - One serve path (axum-server) for plain and TLS listeners
//! - The drain deadline is enforced by the caller-facing handle, not the
//!   server internals, so expiry is reported distinctly

pub mod listener;
pub mod tls;

pub use listener::{start, ListenerError, RunningHandle};
