//! Belvedere — runtime lifecycle orchestration for an HTTP server process.
//!
//! # Architecture Overview
//! ```text
//! Configuration Loader (config)
//!     → Service Container (services: logging → storage → tasks → engine)
//!     → Router builder (http)
//!     → Listener Manager (net, spawned accept loop)
//!     → Shutdown Coordinator (lifecycle, blocks on signal)
//!         → listener drain (bounded) → container unwind → exit
//! ```
//!
//! The library surface exists so integration tests can drive each lifecycle
//! component directly; the binary in `main.rs` is the production entrypoint.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod services;
