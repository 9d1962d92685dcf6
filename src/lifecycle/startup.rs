//! Startup policy.
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, no retries
//! - Startup failures are configuration or environment problems needing an
//!   operator, not transient conditions
//! - Subsystems initialize strictly in order; the listener starts last

use std::fmt::Display;
use std::process::ExitCode;

/// Exit status for a clean, signal-triggered shutdown.
pub const EXIT_OK: ExitCode = ExitCode::SUCCESS;

/// Exit status for startup-fatal and shutdown errors.
pub const EXIT_FAILURE: ExitCode = ExitCode::FAILURE;

/// Unwrap a startup step or terminate the process.
///
/// The Ok value passes through untouched. On Err, `message` is logged with
/// the error as structured context and the process exits non-zero — no
/// partially running state survives a failed startup step.
pub fn fatal<T, E: Display>(message: &str, result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(error = %err, "{message}");
            std::process::exit(1);
        }
    }
}
