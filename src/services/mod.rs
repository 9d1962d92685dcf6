//! Long-lived service subsystems and the container that owns them.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     logging → storage pool → task runner (optional) → HTTP engine state
//!
//! Shutdown:
//!     exact reverse, best-effort, failures aggregated
//! ```
//!
//! # Design Decisions
//! - The container is the only owner of subsystem lifecycles
//! - Handlers see `AppState` clones, never the container itself
//! - Teardown is an explicit ordered stack recorded during construction

pub mod container;
pub mod storage;
pub mod tasks;

pub use container::{AppState, Container, ContainerError, ShutdownError};
