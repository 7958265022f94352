//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Reports the running service and whether metrics are collected.
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": state.config.logging.service_name,
        "version": state.config.logging.service_version,
        "metrics_enabled": state.config.metrics.enabled,
    }))
}
