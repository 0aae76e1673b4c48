//! Timetable event endpoints.
//!
//! Events are not persisted yet: `GET` serves a generated sample week and
//! `POST` echoes the submitted event back without storing it.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use studyflow_types::event::{sample_events, select, upcoming_deadlines, UnknownEventFilter};
use studyflow_types::time::now_millis;
use studyflow_types::{Event, EventFilter, EventKind, EventSource};
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::event::{EventCreatedResponse, EventListQuery, EventsResponse};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_events, create_event, list_upcoming_deadlines),
    components(schemas(EventsResponse, EventCreatedResponse, Event, EventKind, EventSource))
)]
pub struct EventsApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/events",
            get(list_events)
                .post(create_event)
                .fallback(method_not_allowed),
        )
        .route("/events/deadlines", get(list_upcoming_deadlines))
}

#[utoipa::path(
    get,
    path = "/api/events",
    tag = "events",
    params(EventListQuery),
    responses(
        (status = 200, description = "Sample events, earliest first", body = EventsResponse),
        (status = 400, description = "Unknown filter"),
    )
)]
pub async fn list_events(
    query: Result<Query<EventListQuery>, QueryRejection>,
) -> Result<Json<EventsResponse>, ServerError> {
    let Query(query) = query?;
    let filter: EventFilter = query
        .filter
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: UnknownEventFilter| ServerError::BadRequest(e.to_string()))?;

    let now = now_millis();
    let events = select(sample_events(now.date_naive()), filter, now);
    Ok(Json(EventsResponse { events }))
}

#[utoipa::path(
    get,
    path = "/api/events/deadlines",
    tag = "events",
    responses(
        (status = 200, description = "Deadlines within the next seven days", body = EventsResponse),
    )
)]
pub async fn list_upcoming_deadlines() -> Json<EventsResponse> {
    let now = now_millis();
    Json(EventsResponse {
        events: upcoming_deadlines(sample_events(now.date_naive()), now),
    })
}

#[utoipa::path(
    post,
    path = "/api/events",
    tag = "events",
    request_body = Value,
    responses(
        (status = 201, description = "Event echoed back; nothing is stored", body = EventCreatedResponse),
        (status = 400, description = "Body is not JSON"),
    )
)]
pub async fn create_event(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<EventCreatedResponse>), ServerError> {
    let Json(event) = payload?;
    info!("event accepted (not persisted)");
    Ok((
        StatusCode::CREATED,
        Json(EventCreatedResponse {
            message: "Event created".to_owned(),
            event,
        }),
    ))
}

async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "GET, POST")],
        Json(json!({ "message": "Method not allowed" })),
    )
        .into_response()
}
