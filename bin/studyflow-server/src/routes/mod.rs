//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (panic capture, CORS, per-request trace-ID injection)
//! - Optional Swagger UI / OpenAPI spec endpoint (disable with `STUDYFLOW_ENABLE_SWAGGER=false`)
//! - Health / heartbeat route
//! - `/api` routes for tasks, events and auth configuration

mod auth;
pub mod doc;
mod events;
mod health;
mod tasks;

#[cfg(test)]
pub(crate) mod test_support;

use std::any::Any;
use std::sync::Arc;

use axum::body::Bytes;
use http::{header, Response, StatusCode};
use axum::{middleware, Router};
use http_body_util::Full;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

// ── Router builder ────────────────────────────────────────────────────────────

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .merge(tasks::router())
        .merge(events::router())
        .merge(auth::router());

    let mut app = Router::new()
        .merge(health::router())
        .nest("/api", api_router);

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    app
        // Outermost layers execute first on the way in.
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(cors::cors_layer(&state.config)),
        )
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

/// Turn a handler panic into the same 500 body as [`crate::error::ServerError::Internal`].
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response<Full<Bytes>> {
    let details = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "unknown panic".to_owned()
    };
    error!(%details, "handler panicked");

    let body = json!({
        "success": false,
        "error": "Internal server error",
        "details": details,
    });
    let mut response = Response::new(Full::from(body.to_string()));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    response
}
