//! The service container.
//!
//! Owns every long-lived subsystem for the process and is the only place
//! that constructs or releases them. Construction is strictly ordered
//! (logging, storage, tasks, HTTP engine state) because later subsystems
//! depend on earlier ones; each success records a teardown entry so the
//! stack can be unwound in exact reverse order — on shutdown, or on a
//! construction failure partway through.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::observability::logging;
use crate::services::storage;
use crate::services::tasks::{TaskQueue, TaskRunner, TasksError};

/// Error produced when container construction fails.
///
/// By the time the caller sees this, everything constructed for the attempt
/// has already been released.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("storage connection failed: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("task runner failed: {0}")]
    Tasks(#[from] TasksError),
}

/// One subsystem that failed to release during teardown.
#[derive(Debug)]
pub struct ShutdownFailure {
    pub subsystem: &'static str,
    pub message: String,
}

/// Aggregate of every release failure observed during a best-effort teardown.
#[derive(Debug, thiserror::Error)]
#[error("shutdown completed with {} failure(s): {}", .failures.len(), describe(.failures))]
pub struct ShutdownError {
    pub failures: Vec<ShutdownFailure>,
}

fn describe(failures: &[ShutdownFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.subsystem, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// One recorded teardown action. Entries are pushed in construction order
/// and executed in reverse.
#[derive(Debug)]
enum Teardown {
    Logging,
    Storage(SqlitePool),
    Tasks(TaskRunner),
}

impl Teardown {
    fn subsystem(&self) -> &'static str {
        match self {
            Teardown::Logging => "logging",
            Teardown::Storage(_) => "storage",
            Teardown::Tasks(_) => "tasks",
        }
    }

    async fn release(self) -> Result<(), TasksError> {
        match self {
            // The fmt subscriber writes straight to stdout; nothing to flush.
            Teardown::Logging => Ok(()),
            Teardown::Storage(pool) => {
                pool.close().await;
                Ok(())
            }
            Teardown::Tasks(runner) => runner.stop().await,
        }
    }
}

/// Handles shared with request handlers once the container is up.
///
/// Everything in here is a cheap clone of a container-owned resource; the
/// container's lifecycle surface is never exposed through it.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: SqlitePool,
    pub tasks: Option<TaskQueue>,
}

/// The aggregate owning all long-lived subsystem handles for the process.
#[derive(Debug)]
pub struct Container {
    config: Arc<AppConfig>,
    state: AppState,
    teardown: Vec<Teardown>,
}

impl Container {
    /// Construct every subsystem in dependency order.
    ///
    /// A failure at any step releases the subsystems already constructed for
    /// this attempt, in reverse order, before the error is returned — no
    /// half-built container ever reaches the caller.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, ContainerError> {
        let mut teardown: Vec<Teardown> = Vec::new();

        logging::init(config.app.environment);
        teardown.push(Teardown::Logging);
        tracing::info!(subsystem = "logging", "subsystem constructed");

        let db = match storage::connect(&config.database).await {
            Ok(pool) => pool,
            Err(err) => {
                release_all(teardown).await;
                return Err(err.into());
            }
        };
        teardown.push(Teardown::Storage(db.clone()));
        tracing::info!(subsystem = "storage", url = %config.database.url, "subsystem constructed");

        let tasks = if config.tasks.enabled {
            let (runner, queue) = TaskRunner::start(db.clone(), &config.tasks);
            teardown.push(Teardown::Tasks(runner));
            tracing::info!(subsystem = "tasks", "subsystem constructed");
            Some(queue)
        } else {
            tracing::debug!(subsystem = "tasks", "subsystem disabled by configuration");
            None
        };

        // The HTTP engine state is last: it hands out clones of everything
        // above and must only exist once they are all healthy.
        let state = AppState {
            config: config.clone(),
            db,
            tasks,
        };
        tracing::info!(subsystem = "http", "subsystem constructed");

        Ok(Self {
            config,
            state,
            teardown,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Clone of the handles shared with the router and request handlers.
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn db(&self) -> &SqlitePool {
        &self.state.db
    }

    pub fn tasks(&self) -> Option<&TaskQueue> {
        self.state.tasks.as_ref()
    }

    /// Release every owned subsystem in reverse construction order.
    ///
    /// A failure releasing one subsystem never stops the rest from being
    /// attempted; all failures come back aggregated. Taking `self` by value
    /// makes a second teardown of the same container unrepresentable.
    pub async fn shutdown(self) -> Result<(), ShutdownError> {
        let failures = release_all(self.teardown).await;

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ShutdownError { failures })
        }
    }
}

/// Execute teardown entries in reverse, capturing failures instead of
/// aborting the sequence.
async fn release_all(teardown: Vec<Teardown>) -> Vec<ShutdownFailure> {
    let mut failures = Vec::new();

    for entry in teardown.into_iter().rev() {
        let subsystem = entry.subsystem();
        match entry.release().await {
            Ok(()) => {
                tracing::info!(subsystem, "subsystem shutdown");
            }
            Err(err) => {
                tracing::error!(subsystem, error = %err, "subsystem failed to shut down");
                failures.push(ShutdownFailure {
                    subsystem,
                    message: err.to_string(),
                });
            }
        }
    }

    failures
}
