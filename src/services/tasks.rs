//! Background task runner.
//!
//! A single worker task consumes jobs from a bounded queue. The runner is an
//! optional subsystem: the container only constructs it when
//! `tasks.enabled` is set, without changing the ordering contract of its
//! neighbors.
//!
//! Submission and lifecycle are split: `TaskQueue` is a cheap clone handed to
//! request handlers, while `TaskRunner` stays owned by the container's
//! teardown stack so the worker is stopped exactly once.

use std::time::Duration;

use futures_util::future::BoxFuture;
use sqlx::SqlitePool;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::TasksConfig;

/// Bound on how long `stop` waits for the worker to exit.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// A queued unit of background work. Jobs receive a pool handle so they can
/// touch storage without capturing container internals.
pub type Job = Box<dyn FnOnce(SqlitePool) -> BoxFuture<'static, ()> + Send + 'static>;

/// Box an async closure into a [`Job`].
pub fn job<F, Fut>(f: F) -> Job
where
    F: FnOnce(SqlitePool) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    Box::new(move |pool| Box::pin(f(pool)))
}

#[derive(Debug, thiserror::Error)]
pub enum TasksError {
    #[error("task queue is closed")]
    QueueClosed,

    #[error("task worker did not stop within {0:?}")]
    StopTimeout(Duration),

    #[error("task worker panicked")]
    WorkerPanicked,
}

/// Submission handle for background jobs.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    tx: mpsc::Sender<Job>,
}

impl TaskQueue {
    /// Enqueue a job, waiting if the queue is full.
    pub async fn submit(&self, job: Job) -> Result<(), TasksError> {
        self.tx.send(job).await.map_err(|_| TasksError::QueueClosed)
    }
}

/// The owned worker half of the task runner.
#[derive(Debug)]
pub struct TaskRunner {
    shutdown: watch::Sender<bool>,
    worker: JoinHandle<()>,
}

impl TaskRunner {
    /// Spawn the worker and return it together with its submission handle.
    pub fn start(pool: SqlitePool, config: &TasksConfig) -> (TaskRunner, TaskQueue) {
        let (tx, mut rx) = mpsc::channel::<Job>(config.queue_capacity);
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let worker = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    job = rx.recv() => match job {
                        Some(job) => job(pool.clone()).await,
                        None => break,
                    },
                }
            }

            // Drain jobs that were already accepted before the stop signal.
            while let Ok(job) = rx.try_recv() {
                job(pool.clone()).await;
            }

            tracing::debug!("task worker exited");
        });

        tracing::info!(queue_capacity = config.queue_capacity, "task runner started");

        (TaskRunner { shutdown, worker }, TaskQueue { tx })
    }

    /// Stop the worker, bounded by [`STOP_TIMEOUT`].
    pub async fn stop(mut self) -> Result<(), TasksError> {
        let _ = self.shutdown.send(true);

        match tokio::time::timeout(STOP_TIMEOUT, &mut self.worker).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(TasksError::WorkerPanicked),
            Err(_) => {
                self.worker.abort();
                Err(TasksError::StopTimeout(STOP_TIMEOUT))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn test_pool() -> SqlitePool {
        SqlitePool::connect("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn executes_submitted_jobs() {
        let (runner, queue) = TaskRunner::start(test_pool().await, &TasksConfig::default());

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let counter = counter.clone();
            queue
                .submit(job(move |_pool| async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }))
                .await
                .unwrap();
        }

        runner.stop().await.unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn jobs_can_reach_storage() {
        let (runner, queue) = TaskRunner::start(test_pool().await, &TasksConfig::default());

        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        queue
            .submit(job(move |pool| async move {
                let ok = sqlx::query("SELECT 1").execute(&pool).await.is_ok();
                let _ = done_tx.send(ok);
            }))
            .await
            .unwrap();

        assert!(done_rx.await.unwrap());
        runner.stop().await.unwrap();
    }

    #[tokio::test]
    async fn submit_after_stop_is_rejected() {
        let (runner, queue) = TaskRunner::start(test_pool().await, &TasksConfig::default());
        runner.stop().await.unwrap();

        let result = queue.submit(job(|_pool| async {})).await;
        assert!(matches!(result, Err(TasksError::QueueClosed)));
    }
}
