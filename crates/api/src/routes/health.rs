//! Liveness endpoint.

use axum::Json;
use serde_json::{json, Value};

/// GET /health — reports that the server is up.
pub async fn check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
