//! Sign-in provider configuration for the front end.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::schemas::auth::AuthConfigResponse;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_auth_config), components(schemas(AuthConfigResponse)))]
pub struct AuthApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/config", get(get_auth_config))
}

/// Whether the front end should mount the sign-in provider, and with which
/// publishable key. When disabled, pages render unauthenticated.
#[utoipa::path(
    get,
    path = "/api/auth/config",
    tag = "auth",
    responses(
        (status = 200, description = "Resolved authentication mode", body = AuthConfigResponse)
    )
)]
pub async fn get_auth_config(State(state): State<Arc<AppState>>) -> Json<AuthConfigResponse> {
    Json(AuthConfigResponse::from(&state.config.auth))
}
