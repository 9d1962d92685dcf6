//! Signal-driven shutdown coordination.
//!
//! The coordinator owns the running listener and the service container from
//! the moment the listener reports it is up. It blocks on the signal future,
//! then drives the one and only teardown: stop the listener within the drain
//! deadline, then unwind the container. Concurrent or repeated drains are
//! no-ops — the owned halves live behind a `Mutex<Option<_>>` and only the
//! first caller can take them.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::lifecycle::signals;
use crate::net::RunningHandle;
use crate::services::container::ShutdownFailure;
use crate::services::{Container, ShutdownError};

/// Observable coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    WaitingForSignal,
    Draining,
    Terminated,
}

struct Owned {
    listener: RunningHandle,
    container: Container,
}

/// Drives the ordered, bounded-time shutdown of the process.
pub struct Coordinator {
    owned: Mutex<Option<Owned>>,
    state: AtomicU8,
}

impl Coordinator {
    /// Take ownership of the running listener and the container.
    pub fn new(listener: RunningHandle, container: Container) -> Self {
        Self {
            owned: Mutex::new(Some(Owned {
                listener,
                container,
            })),
            state: AtomicU8::new(State::WaitingForSignal as u8),
        }
    }

    pub fn state(&self) -> State {
        match self.state.load(Ordering::Acquire) {
            0 => State::WaitingForSignal,
            1 => State::Draining,
            _ => State::Terminated,
        }
    }

    /// Block until a termination signal arrives, then drain.
    pub async fn run(&self, drain_deadline: Duration) -> Result<(), ShutdownError> {
        signals::terminated().await;
        self.drain(drain_deadline).await
    }

    /// Perform the teardown: listener first, container second.
    ///
    /// Idempotent — a second call (including one racing the first) finds
    /// nothing left to tear down and returns Ok immediately. A listener
    /// failure is recorded and does not stop the container from being
    /// unwound; all failures come back in one aggregate.
    pub async fn drain(&self, deadline: Duration) -> Result<(), ShutdownError> {
        let owned = {
            let mut guard = self.owned.lock().expect("coordinator lock poisoned");
            guard.take()
        };

        let Some(Owned {
            listener,
            container,
        }) = owned
        else {
            return Ok(());
        };

        self.state.store(State::Draining as u8, Ordering::Release);
        tracing::info!(deadline = ?deadline, "draining");

        let mut failures: Vec<ShutdownFailure> = Vec::new();

        if let Err(err) = listener.stop(deadline).await {
            tracing::error!(error = %err, "listener did not stop cleanly");
            failures.push(ShutdownFailure {
                subsystem: "listener",
                message: err.to_string(),
            });
        }

        if let Err(err) = container.shutdown().await {
            failures.extend(err.failures);
        }

        self.state.store(State::Terminated as u8, Ordering::Release);

        if failures.is_empty() {
            tracing::info!("shutdown complete");
            Ok(())
        } else {
            Err(ShutdownError { failures })
        }
    }
}
