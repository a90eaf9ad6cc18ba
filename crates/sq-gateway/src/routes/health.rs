//! Health check endpoint.

use axum::Json;
use serde_json::{Value, json};

/// GET /health — liveness check. Does not touch the model or catalog.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
