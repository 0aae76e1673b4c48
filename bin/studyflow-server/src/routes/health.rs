//! Health / heartbeat endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health))]
pub struct HealthApi;

/// Register health-check routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// Heartbeat endpoint.
///
/// Returns `{"status": "ok", "version": "...", "persistence": ..., "auth": ...}`
/// with HTTP 200. `persistence` is `disabled` when no webhook is configured;
/// the server still answers task requests in that case.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is healthy", body = Value)
    )
)]
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let persistence = if state.webhook.is_configured() {
        "configured"
    } else {
        "disabled"
    };
    Json(json!({
        "status":      "ok",
        "version":     env!("CARGO_PKG_VERSION"),
        "persistence": persistence,
        "auth":        state.config.auth.as_str(),
    }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
