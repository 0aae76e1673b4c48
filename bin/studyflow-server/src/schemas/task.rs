use serde::{Deserialize, Serialize};
use serde_json::Value;
use studyflow_types::Task;
use utoipa::{IntoParams, ToSchema};

use crate::webhook::PersistenceOutcome;

/// Shown with an empty list when stored tasks could not be fetched.
pub const FETCH_FAILED_MESSAGE: &str =
    "Unable to fetch tasks. Please check the automation webhook configuration.";

pub const DELETED_MESSAGE: &str = "Task deleted successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskSort {
    /// Priority first, then earliest deadline.
    Agenda,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TaskListQuery {
    /// `todo`, `in-progress` or `completed`.
    pub status: Option<String>,
    /// `low`, `normal`, `high` or `urgent`.
    pub priority: Option<String>,
    pub sort: Option<TaskSort>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct TaskIdQuery {
    /// ID of the task to delete.
    pub id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskListResponse {
    pub success: bool,
    /// Stored records as returned by the workflow.
    pub tasks: Vec<Value>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TaskListResponse {
    pub fn new(tasks: Vec<Value>, message: Option<&str>) -> Self {
        Self {
            success: true,
            count: tasks.len(),
            tasks,
            message: message.map(str::to_owned),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TaskResponse {
    pub success: bool,
    pub task: Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence: Option<PersistenceOutcome>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence: Option<PersistenceOutcome>,
}
