//! OS signal handling.
//!
//! # Design Decisions
//! - Uses Tokio's signal futures (async-safe), one blocking await, no polling
//! - SIGINT and SIGTERM both mean "shut down"; there is no reload signal
//! - Signals arriving after the first are left to the OS queue; the
//!   coordinator's drain path is idempotent regardless

/// Wait until the process receives a termination signal.
///
/// Resolves on SIGINT or SIGTERM on unix, Ctrl-C elsewhere. A handler
/// registration failure is unrecoverable this early, so it panics rather
/// than limping on without a shutdown path.
pub async fn terminated() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut interrupt =
            signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");
        let mut terminate =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = interrupt.recv() => tracing::info!(signal = "SIGINT", "termination signal received"),
            _ = terminate.recv() => tracing::info!(signal = "SIGTERM", "termination signal received"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to register Ctrl-C handler");
        tracing::info!(signal = "ctrl-c", "termination signal received");
    }
}
