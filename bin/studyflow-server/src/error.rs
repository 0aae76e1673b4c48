//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! Webhook failures never reach this type: handlers absorb them and answer
//! optimistically. What remains is caller input (400) and unexpected internal
//! failures (500). Internal failures are logged in full and their message is
//! passed through to the caller under `details`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use studyflow_types::TaskError;
use thiserror::Error;
use tracing::error;

/// All errors that can occur in the studyflow-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// One or more input constraints failed; every violation is listed.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The caller sent an invalid or incomplete request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "errors": errors }),
            ),
            ServerError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({ "success": false, "error": message }),
            ),
            ServerError::Internal(message) => {
                error!(message = %message, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": "Internal server error",
                        "details": message,
                    }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<TaskError> for ServerError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::MissingId => ServerError::BadRequest(e.to_string()),
            TaskError::Invalid(errors) => ServerError::Validation(errors),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Validation(vec![rejection.body_text()])
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::Validation(vec![rejection.body_text()])
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(e: serde_json::Error) -> Self {
        ServerError::Internal(e.to_string())
    }
}
