//! Listener bind, drain, and TLS failure tests.

mod common;

use std::time::{Duration, Instant};

use axum::routing::get;
use axum::Router;

use belvedere::net::{self, ListenerError};

use common::test_config;

#[tokio::test]
async fn stop_with_no_connections_returns_promptly() {
    let config = test_config();
    let router = Router::new().route("/", get(|| async { "ok" }));
    let listener = net::start(router, &config.http).await.unwrap();

    let started = Instant::now();
    listener.stop(Duration::from_secs(5)).await.unwrap();

    // Nothing in flight, so the drain must not eat into the deadline.
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn stop_force_closes_connection_past_the_deadline() {
    let config = test_config();
    let router = Router::new().route(
        "/slow",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            "done"
        }),
    );
    let listener = net::start(router, &config.http).await.unwrap();
    let addr = listener.local_addr();

    // Park one long-running request on the server.
    let client = tokio::spawn(async move { reqwest::get(format!("http://{addr}/slow")).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(listener.connection_count() > 0);

    let started = Instant::now();
    let err = listener.stop(Duration::from_millis(300)).await.unwrap_err();

    assert!(matches!(
        err,
        ListenerError::DrainDeadlineExceeded {
            open_connections
        } if open_connections > 0
    ));
    // Deadline plus the forced-close grace, not the request's 30 seconds.
    assert!(started.elapsed() < Duration::from_secs(3));

    // The parked client sees a closed connection, not a hang.
    assert!(client.await.unwrap().is_err());
}

#[tokio::test]
async fn unreadable_tls_material_fails_before_bind() {
    let mut config = (*test_config()).clone();
    config.http.tls.enabled = true;
    config.http.tls.certificate = "/no/such/cert.pem".to_string();
    config.http.tls.key = "/no/such/key.pem".to_string();

    // Pin a port so we can prove the listener never bound it.
    let probe = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = probe.local_addr().unwrap().port();
    drop(probe);
    config.http.port = port;

    let router = Router::new().route("/", get(|| async { "ok" }));
    let err = net::start(router, &config.http).await.unwrap_err();
    assert!(matches!(err, ListenerError::Tls(_)));

    // The port is still free: the failure happened before any socket opened.
    std::net::TcpListener::bind(("127.0.0.1", port)).unwrap();
}

#[tokio::test]
async fn bind_conflict_is_reported() {
    let mut config = (*test_config()).clone();

    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    config.http.port = occupied.local_addr().unwrap().port();

    let router = Router::new().route("/", get(|| async { "ok" }));
    let err = net::start(router, &config.http).await.unwrap_err();
    assert!(matches!(err, ListenerError::Bind { .. }));
}
