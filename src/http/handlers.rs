//! Request handlers registered by the router builder.

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe. Returns a fixed payload once the listener is accepting.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
