//! Observability subsystem.
//!
//! Structured logging only; every lifecycle transition (subsystem
//! constructed, subsystem shutdown, listener bound, signal received) carries
//! structured fields so the process can be followed from the outside.

pub mod logging;
