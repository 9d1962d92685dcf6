//! Listener lifecycle: bind, serve, bounded-drain stop.
//!
//! # Responsibilities
//! - Load TLS material (when enabled) before any socket is opened
//! - Bind the configured address
//! - Run the accept loop as an independently scheduled task
//! - Stop accepting and drain in-flight requests within a deadline
//!
//! Per-connection accept and I/O errors are absorbed by the serve loop and
//! surfaced through request tracing; they never take the listener down.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::Router;
use axum_server::Handle;
use tokio::task::JoinHandle;

use crate::config::HttpConfig;
use crate::net::tls;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("failed to load TLS material: {0}")]
    Tls(std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("listener failed: {0}")]
    Serve(std::io::Error),

    #[error("listener task failed: {0}")]
    Task(tokio::task::JoinError),

    #[error("drain deadline exceeded with {open_connections} connection(s) still open")]
    DrainDeadlineExceeded { open_connections: usize },
}

/// A running listener: the bound address plus the handles needed to stop it.
///
/// Consumed by [`RunningHandle::stop`]; a stopped listener is never reused.
#[derive(Debug)]
pub struct RunningHandle {
    local_addr: SocketAddr,
    handle: Handle,
    task: JoinHandle<Result<(), std::io::Error>>,
}

/// Bind the configured address and start serving `router` on a spawned task.
///
/// When TLS is enabled the certificate/key pair is loaded synchronously
/// first — a load failure returns before any socket is opened.
pub async fn start(router: Router, config: &HttpConfig) -> Result<RunningHandle, ListenerError> {
    let tls_config = if config.tls.enabled {
        let loaded = tls::load(Path::new(&config.tls.certificate), Path::new(&config.tls.key))
            .await
            .map_err(ListenerError::Tls)?;
        Some(loaded)
    } else {
        None
    };

    let addr = config.address();
    let listener = std::net::TcpListener::bind(&addr).map_err(|source| ListenerError::Bind {
        addr: addr.clone(),
        source,
    })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| ListenerError::Bind { addr, source })?;
    let local_addr = listener.local_addr().map_err(ListenerError::Serve)?;

    let handle = Handle::new();
    let service = router.into_make_service();

    let task = match tls_config {
        Some(tls_config) => {
            let server = axum_server::from_tcp_rustls(listener, tls_config).handle(handle.clone());
            tokio::spawn(async move { server.serve(service).await })
        }
        None => {
            let server = axum_server::from_tcp(listener).handle(handle.clone());
            tokio::spawn(async move { server.serve(service).await })
        }
    };

    tracing::info!(
        address = %local_addr,
        tls_enabled = config.tls.enabled,
        "listener bound"
    );

    Ok(RunningHandle {
        local_addr,
        handle,
        task,
    })
}

impl RunningHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Connections currently tracked by the server.
    pub fn connection_count(&self) -> usize {
        self.handle.connection_count()
    }

    /// Stop accepting new connections, then wait up to `deadline` for
    /// in-flight requests to finish.
    ///
    /// On expiry the remaining connections are force-closed and the call
    /// reports how many were still open. A listener whose serve task already
    /// returned cleanly (stopped concurrently, or closed naturally) is not
    /// an error.
    pub async fn stop(mut self, deadline: Duration) -> Result<(), ListenerError> {
        // Graceful phase: stop accepting, let in-flight requests complete.
        // The deadline is enforced here rather than handed to the server so
        // the expiry outcome is unambiguous.
        self.handle.graceful_shutdown(None);

        match tokio::time::timeout(deadline, &mut self.task).await {
            Ok(Ok(Ok(()))) => {
                tracing::info!("listener stopped");
                Ok(())
            }
            Ok(Ok(Err(err))) => Err(ListenerError::Serve(err)),
            Ok(Err(join_err)) => Err(ListenerError::Task(join_err)),
            Err(_) => {
                let open_connections = self.handle.connection_count();
                tracing::warn!(open_connections, "drain deadline exceeded, force-closing");

                self.handle.shutdown();
                // Give the forced close a moment to unwind before abandoning
                // the task outright.
                if tokio::time::timeout(Duration::from_secs(1), &mut self.task)
                    .await
                    .is_err()
                {
                    self.task.abort();
                }

                Err(ListenerError::DrainDeadlineExceeded { open_connections })
            }
        }
    }
}
