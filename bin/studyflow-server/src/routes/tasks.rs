//! Task CRUD endpoints.
//!
//! Handlers validate and shape records; persistence is the webhook's job.
//! Mutations are answered optimistically: a webhook failure is logged (and,
//! when configured, reported under `persistence`) but never changes the
//! status code. A failed read answers 200 with an empty list and a message.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use studyflow_types::time::now_millis;
use studyflow_types::{AgendaKey, Task, TaskFilter, TaskInput};
use tracing::{info, warn};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::schemas::task::{
    DeleteResponse, TaskIdQuery, TaskListQuery, TaskListResponse, TaskResponse, TaskSort,
    DELETED_MESSAGE, FETCH_FAILED_MESSAGE,
};
use crate::state::AppState;
use crate::webhook::{unwrap_record, PersistenceOutcome, WebhookAction, WebhookError};

pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, create_task, update_task, delete_task),
    components(schemas(TaskListResponse, TaskResponse, DeleteResponse, TaskSort, TaskInput, PersistenceOutcome))
)]
pub struct TasksApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/tasks",
        get(list_tasks)
            .post(create_task)
            .put(update_task)
            .delete(delete_task)
            .fallback(method_not_allowed),
    )
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "Stored tasks; empty with a message when the webhook is unavailable", body = TaskListResponse),
        (status = 400, description = "Invalid filter"),
    )
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TaskListQuery>, QueryRejection>,
) -> Result<Json<TaskListResponse>, ServerError> {
    let Query(query) = query?;
    let filter = TaskFilter::parse(query.status.as_deref(), query.priority.as_deref())?;

    match state.webhook.read(filter.to_json()).await {
        Ok(listing) => {
            let mut tasks: Vec<Value> = listing
                .tasks
                .into_iter()
                .filter_map(unwrap_record)
                .filter(|record| filter.matches_record(record))
                .collect();
            if query.sort == Some(TaskSort::Agenda) {
                tasks.sort_by_key(AgendaKey::of_record);
            }
            info!(count = tasks.len(), "returning stored tasks");
            Ok(Json(TaskListResponse::new(tasks, None)))
        }
        Err(e) => {
            warn!(error = %e, "could not fetch tasks; returning empty list");
            Ok(Json(TaskListResponse::new(Vec::new(), Some(FETCH_FAILED_MESSAGE))))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = TaskInput,
    responses(
        (status = 201, description = "Task accepted (persistence is best-effort)", body = TaskResponse),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal error"),
    )
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ServerError> {
    let Json(input) = payload?;
    let task = Task::create(input, now_millis())
        .inspect_err(|e| warn!(errors = ?e.messages(), "rejecting invalid task"))?;
    info!(task_id = %task.id, "task created");

    let result = state
        .webhook
        .send(WebhookAction::Create, serde_json::to_value(&task)?)
        .await;
    let outcome = record_outcome(WebhookAction::Create, &task.id, &result);

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            success: true,
            task,
            persistence: state.visible_outcome(outcome),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/tasks",
    tag = "tasks",
    request_body = TaskInput,
    responses(
        (status = 200, description = "Task updated (persistence is best-effort)", body = TaskResponse),
        (status = 400, description = "Missing id or validation failed"),
        (status = 500, description = "Internal error"),
    )
)]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaskInput>, JsonRejection>,
) -> Result<Json<TaskResponse>, ServerError> {
    let Json(input) = payload?;
    let carried_created_at = input.created_at_timestamp().is_some();
    let task = Task::update(input, now_millis())
        .inspect_err(|e| warn!(errors = ?e.messages(), "rejecting invalid task update"))?;
    if !carried_created_at {
        warn!(task_id = %task.id, "update has no valid createdAt; using now");
    }

    let result = state
        .webhook
        .send(WebhookAction::Update, serde_json::to_value(&task)?)
        .await;
    let outcome = record_outcome(WebhookAction::Update, &task.id, &result);

    Ok(Json(TaskResponse {
        success: true,
        task,
        persistence: state.visible_outcome(outcome),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/tasks",
    tag = "tasks",
    params(TaskIdQuery),
    responses(
        (status = 200, description = "Deletion forwarded (persistence is best-effort)", body = DeleteResponse),
        (status = 400, description = "Missing id"),
    )
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TaskIdQuery>, QueryRejection>,
) -> Result<Json<DeleteResponse>, ServerError> {
    let Query(query) = query?;
    let id = query
        .id
        .map(|id| id.trim().to_owned())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ServerError::BadRequest("Task ID is required".to_owned()))?;

    let result = state
        .webhook
        .send(WebhookAction::Delete, json!({ "id": id }))
        .await;
    let outcome = record_outcome(WebhookAction::Delete, &id, &result);

    Ok(Json(DeleteResponse {
        success: true,
        message: DELETED_MESSAGE.to_owned(),
        persistence: state.visible_outcome(outcome),
    }))
}

async fn method_not_allowed(method: Method) -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
        Json(json!({
            "success": false,
            "error": format!("Method {method} Not Allowed"),
        })),
    )
        .into_response()
}

fn record_outcome(
    action: WebhookAction,
    task_id: &str,
    result: &Result<Value, WebhookError>,
) -> PersistenceOutcome {
    let outcome = PersistenceOutcome::of(result);
    match &outcome {
        PersistenceOutcome::Confirmed => info!(%action, %task_id, "task change persisted"),
        PersistenceOutcome::NotConfigured => {
            warn!(%action, %task_id, "webhook not configured; task change not persisted")
        }
        PersistenceOutcome::Unconfirmed { reason } => {
            warn!(%action, %task_id, %reason, "webhook failed; task change not persisted")
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::routes::test_support::{app, app_with, request, send};
    use tracing_test::traced_test;
    use wiremock::matchers::{body_partial_json, method as http_method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn webhook_replying(status: u16, body: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(http_method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn config_for(server: &MockServer) -> Config {
        Config {
            webhook_url: Some(server.uri()),
            ..Config::default()
        }
    }

    // ── POST ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn create_with_blank_title_is_rejected() {
        let (status, _, body) = send(app(), request("POST", "/api/tasks", Some(json!({ "title": "" })))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"], json!(["Title is required"]));
    }

    #[tokio::test]
    async fn create_with_long_title_is_rejected() {
        let title = "x".repeat(201);
        let (status, _, body) = send(app(), request("POST", "/api/tasks", Some(json!({ "title": title })))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"], json!(["Title must be 200 characters or less"]));
    }

    #[tokio::test]
    async fn create_reports_every_violation() {
        let input = json!({ "title": "ok", "priority": "asap", "status": "done", "deadline": "someday" });
        let (status, _, body) = send(app(), request("POST", "/api/tasks", Some(input))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"],
            json!(["Invalid priority value", "Invalid status value", "Invalid deadline date"])
        );
    }

    #[tokio::test]
    async fn create_minimal_task_fills_defaults() {
        let (status, _, body) = send(app(), request("POST", "/api/tasks", Some(json!({ "title": "Buy milk" })))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);

        let task = &body["task"];
        assert_eq!(task["title"], "Buy milk");
        assert_eq!(task["priority"], "normal");
        assert_eq!(task["status"], "todo");
        assert_eq!(task["description"], "");
        assert_eq!(task["deadline"], Value::Null);
        assert_eq!(task["createdAt"], task["updatedAt"]);

        let id = task["id"].as_str().unwrap();
        let millis = id.strip_prefix("task-").unwrap();
        assert!(!millis.is_empty() && millis.chars().all(|c| c.is_ascii_digit()));
        // Persistence details are hidden unless configured.
        assert!(body.get("persistence").is_none());
    }

    #[tokio::test]
    async fn create_forwards_record_to_webhook() {
        let server = MockServer::start().await;
        Mock::given(http_method("POST"))
            .and(body_partial_json(json!({
                "action": "create",
                "type": "task",
                "id": "essay-1",
                "title": "Essay",
                "priority": "high",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let config = Config {
            surface_persistence: true,
            ..config_for(&server)
        };
        let input = json!({ "id": "essay-1", "title": "Essay", "priority": "high" });
        let (status, _, body) = send(app_with(config), request("POST", "/api/tasks", Some(input))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["task"]["id"], "essay-1");
        assert_eq!(body["persistence"], json!({ "status": "confirmed" }));
    }

    #[tokio::test]
    #[traced_test]
    async fn create_is_optimistic_when_webhook_fails() {
        let server = webhook_replying(503, json!({ "error": "down" })).await;
        let config = Config {
            surface_persistence: true,
            ..config_for(&server)
        };

        let (status, _, body) = send(app_with(config), request("POST", "/api/tasks", Some(json!({ "title": "Lab report" })))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["task"]["title"], "Lab report");
        assert_eq!(body["persistence"]["status"], "unconfirmed");
        assert!(logs_contain("task change not persisted"));
    }

    #[tokio::test]
    async fn create_with_malformed_json_is_a_client_error() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/api/tasks")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{ not json"))
            .unwrap();
        let (status, _, body) = send(app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
    }

    // ── PUT ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn update_without_id_is_rejected() {
        let (status, _, body) = send(app(), request("PUT", "/api/tasks", Some(json!({ "title": "x" })))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Task ID is required"));
    }

    #[tokio::test]
    async fn update_is_validated_again() {
        let input = json!({ "id": "task-1", "title": "x", "status": "archived" });
        let (status, _, body) = send(app(), request("PUT", "/api/tasks", Some(input))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"], json!(["Invalid status value"]));
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_and_keeps_created_at() {
        let server = MockServer::start().await;
        Mock::given(http_method("POST"))
            .and(body_partial_json(json!({ "action": "update", "id": "task-1", "status": "completed" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let input = json!({
            "id": "task-1",
            "title": "Essay",
            "status": "completed",
            "createdAt": "2025-01-01T08:00:00.000Z",
            "updatedAt": "2025-01-01T08:00:00.000Z",
        });
        let (status, _, body) = send(app_with(config_for(&server)), request("PUT", "/api/tasks", Some(input))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["task"]["createdAt"], "2025-01-01T08:00:00.000Z");
        assert_ne!(body["task"]["updatedAt"], "2025-01-01T08:00:00.000Z");
        assert_eq!(body["task"]["status"], "completed");
    }

    // ── DELETE ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn delete_without_id_is_rejected() {
        for uri in ["/api/tasks", "/api/tasks?id=", "/api/tasks?id=%20"] {
            let (status, _, body) = send(app(), request("DELETE", uri, None)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"], "Task ID is required");
        }
    }

    #[tokio::test]
    async fn delete_forwards_only_the_id() {
        let server = MockServer::start().await;
        Mock::given(http_method("POST"))
            .and(body_partial_json(json!({ "action": "delete", "type": "task", "id": "task-9" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (status, _, body) = send(app_with(config_for(&server)), request("DELETE", "/api/tasks?id=task-9", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], DELETED_MESSAGE);
    }

    #[tokio::test]
    async fn delete_succeeds_without_webhook() {
        let (status, _, body) = send(app(), request("DELETE", "/api/tasks?id=task-9", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn padded_id_is_deleted_by_the_id_it_was_stored_under() {
        let server = MockServer::start().await;
        Mock::given(http_method("POST"))
            .and(body_partial_json(json!({ "action": "create", "id": "abc" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(http_method("POST"))
            .and(body_partial_json(json!({ "action": "delete", "id": "abc" })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let input = json!({ "id": " abc ", "title": "x" });
        let (status, _, body) = send(app_with(config_for(&server)), request("POST", "/api/tasks", Some(input))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["task"]["id"], "abc");

        let (status, _, _) = send(app_with(config_for(&server)), request("DELETE", "/api/tasks?id=%20abc%20", None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    #[traced_test]
    async fn update_is_optimistic_when_webhook_fails() {
        let server = webhook_replying(502, json!({ "error": "down" })).await;
        let config = Config {
            surface_persistence: true,
            ..config_for(&server)
        };

        let input = json!({ "id": "task-1", "title": "Essay", "status": "in-progress" });
        let (status, _, body) = send(app_with(config), request("PUT", "/api/tasks", Some(input))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["task"]["status"], "in-progress");
        assert_eq!(body["persistence"]["status"], "unconfirmed");
        assert!(logs_contain("task change not persisted"));
    }

    #[tokio::test]
    #[traced_test]
    async fn delete_is_optimistic_when_webhook_fails() {
        let server = webhook_replying(502, json!({ "error": "down" })).await;
        let config = Config {
            surface_persistence: true,
            ..config_for(&server)
        };

        let (status, _, body) = send(app_with(config), request("DELETE", "/api/tasks?id=task-1", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["persistence"]["status"], "unconfirmed");
        assert!(body["persistence"]["reason"].as_str().unwrap().contains("502"));
        assert!(logs_contain("task change not persisted"));
    }

    // ── GET ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn list_survives_unreachable_webhook() {
        let config = Config {
            webhook_url: Some("http://127.0.0.1:9/webhook".to_owned()),
            ..Config::default()
        };
        let (status, _, body) = send(app_with(config), request("GET", "/api/tasks", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["tasks"], json!([]));
        assert_eq!(body["count"], 0);
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_survives_webhook_error_status() {
        let server = webhook_replying(500, json!({ "error": "boom" })).await;
        let (status, _, body) = send(app_with(config_for(&server)), request("GET", "/api/tasks", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tasks"], json!([]));
        assert_eq!(body["message"], FETCH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn list_without_webhook_explains_why_it_is_empty() {
        let (status, _, body) = send(app(), request("GET", "/api/tasks", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
        assert_eq!(body["message"], FETCH_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn list_flattens_envelopes_and_filters() {
        let server = webhook_replying(
            200,
            json!([
                { "json": { "documents": [{ "id": "a", "title": "A", "status": "todo", "priority": "low" }] } },
                { "json": { "id": "b", "title": "B", "status": "completed", "priority": "high" } },
                { "id": "c", "title": "C", "status": "todo", "priority": "urgent" },
                null,
            ]),
        )
        .await;

        let (status, _, body) = send(app_with(config_for(&server)), request("GET", "/api/tasks", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        assert!(body.get("message").is_none());

        let (_, _, body) = send(
            app_with(config_for(&server)),
            request("GET", "/api/tasks?status=todo&sort=agenda", None),
        )
        .await;
        let ids: Vec<&str> = body["tasks"].as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["c", "a"]);
    }

    #[tokio::test]
    async fn list_forwards_filters_to_webhook() {
        let server = MockServer::start().await;
        Mock::given(http_method("POST"))
            .and(body_partial_json(json!({ "action": "read", "filters": { "priority": "urgent" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "documents": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let (status, _, body) = send(app_with(config_for(&server)), request("GET", "/api/tasks?priority=urgent", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn list_rejects_unknown_filter_values() {
        let (status, _, body) = send(app(), request("GET", "/api/tasks?status=archived", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"], json!(["Invalid status value"]));
    }

    // ── Other methods ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn unsupported_method_lists_allowed_verbs() {
        let (status, headers, body) = send(app(), request("PATCH", "/api/tasks", None)).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers[header::ALLOW], ALLOWED_METHODS);
        assert_eq!(body["error"], "Method PATCH Not Allowed");
    }
}
