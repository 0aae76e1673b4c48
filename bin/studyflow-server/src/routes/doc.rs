use crate::routes::{auth, events, health, tasks};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(info(
    title = "studyflow-server",
    description = "Task and timetable API. Tasks are persisted through an automation webhook.",
    version = "0.1.0",
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(tasks::TasksApi::openapi());
    root.merge(events::EventsApi::openapi());
    root.merge(auth::AuthApi::openapi());
    root
}
