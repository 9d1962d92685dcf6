//! Router construction.
//!
//! The lifecycle orchestrator calls [`build`] exactly once, after the
//! container is up and before the listener starts. Routes see the
//! container's shared state; the middleware stack (trace, timeout, request
//! ID) wraps everything registered here.

use axum::routing::get;
use axum::Router;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::request::MakeRequestUuid;
use crate::services::Container;

/// Error produced while registering routes.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("handler registration failed: {0}")]
    Handler(String),
}

/// Build the application router against the container's engine state.
pub fn build(container: &Container) -> Result<Router, RouterError> {
    let request_timeout = container.config().http.request_timeout();

    let router = Router::new()
        .route("/health", get(handlers::health))
        .with_state(container.state())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::config::AppConfig;

    async fn test_container() -> Container {
        let mut config = AppConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        Container::new(Arc::new(config)).await.unwrap()
    }

    #[tokio::test]
    async fn health_route_carries_a_request_id() {
        let container = test_container().await;
        let router = build(&container).unwrap();

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        container.shutdown().await.unwrap();
    }
}
