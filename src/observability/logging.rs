//! Structured logging setup.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - `RUST_LOG` wins when set; otherwise the default filter follows the
//!   deployment environment (debug in development, info in production)
//! - Init is idempotent: a process (or test binary) that wires logging more
//!   than once keeps the first subscriber

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Install the global tracing subscriber for the given environment.
///
/// Repeated calls are no-ops.
pub fn init(environment: Environment) {
    let default_filter = match environment {
        Environment::Production => "belvedere=info,tower_http=info",
        Environment::Development | Environment::Test => "belvedere=debug,tower_http=debug",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // try_init fails only when a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
