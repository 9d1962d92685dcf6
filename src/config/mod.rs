//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file)
//!     → loader.rs (BELVEDERE_* env overrides)
//!     → validation.rs (semantic checks, all errors collected)
//!     → AppConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is an immutable snapshot; there is no reload path
//! - All fields have defaults so an empty config is runnable
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{AppConfig, DatabaseConfig, Environment, HttpConfig, TasksConfig, TlsConfig};
