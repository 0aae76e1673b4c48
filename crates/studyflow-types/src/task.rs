//! The task record, its caller-facing input shape and construction rules.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::error::TaskError;
use crate::time::parse_timestamp;
use crate::validation::{self, non_blank};

/// Task urgency. Wire values are lowercase.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash,
    Serialize, Deserialize, ToSchema, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    #[default]
    Normal,
    High,
    Urgent,
}

impl TaskPriority {
    /// Position in the task list; lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::Urgent => 0,
            TaskPriority::High => 1,
            TaskPriority::Normal => 2,
            TaskPriority::Low => 3,
        }
    }
}

/// Task progress. `InProgress` is `in-progress` on the wire.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash,
    Serialize, Deserialize, ToSchema, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

/// A partial task as sent by a client on create or update.
///
/// Enum-valued fields are kept as raw strings so that an unknown value is
/// reported by [`crate::validate`] alongside every other violation instead of
/// failing deserialization outright.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl TaskInput {
    /// Input carrying only a title; everything else takes its default.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// The caller-supplied creation time, if present and parseable.
    pub fn created_at_timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// A canonical, well-formed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, with = "crate::time::iso_millis_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(with = "crate::time::iso_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::time::iso_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a new task from caller input.
    ///
    /// The id is the caller's when supplied, otherwise `task-<epoch millis>`.
    /// `createdAt` and `updatedAt` are both `now`.
    pub fn create(input: TaskInput, now: DateTime<Utc>) -> Result<Self, TaskError> {
        ensure_valid(&input)?;
        let id = caller_id(&input).unwrap_or_else(|| generate_id(now));
        Ok(Self::assemble(id, input, now, now))
    }

    /// Build the full replacement record for an update.
    ///
    /// Requires an id. `createdAt` is carried over from the input when it
    /// parses, otherwise it falls back to `now`. `updatedAt` is always `now`.
    pub fn update(input: TaskInput, now: DateTime<Utc>) -> Result<Self, TaskError> {
        let id = caller_id(&input).ok_or(TaskError::MissingId)?;
        ensure_valid(&input)?;
        let created_at = input.created_at_timestamp().unwrap_or(now);
        Ok(Self::assemble(id, input, created_at, now))
    }

    /// Fields are assumed to have passed validation.
    fn assemble(
        id: String,
        input: TaskInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let priority = non_blank(input.priority.as_deref())
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let status = non_blank(input.status.as_deref())
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        let deadline = input.deadline.as_deref().and_then(parse_timestamp);
        let meeting_link = non_blank(input.meeting_link.as_deref()).map(str::to_owned);

        Self {
            id,
            title: input.title.unwrap_or_default().trim().to_owned(),
            description: input.description.unwrap_or_default(),
            priority,
            status,
            deadline,
            meeting_link,
            created_at,
            updated_at,
        }
    }
}

/// Caller-supplied ids are stored trimmed so the same id can later address
/// the record from a query string.
fn caller_id(input: &TaskInput) -> Option<String> {
    non_blank(input.id.as_deref()).map(|id| id.trim().to_owned())
}

fn ensure_valid(input: &TaskInput) -> Result<(), TaskError> {
    let errors = validation::validate(input);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TaskError::Invalid(errors))
    }
}

/// Server-generated task id.
pub fn generate_id(now: DateTime<Utc>) -> String {
    format!("task-{}", now.timestamp_millis())
}

// ── List views ──────────────────────────────────────────────────────────────

/// Optional list filters for the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskFilter {
    /// Parse raw query values. Blank values mean "no filter".
    pub fn parse(status: Option<&str>, priority: Option<&str>) -> Result<Self, TaskError> {
        let mut errors = Vec::new();
        let status = match non_blank(status) {
            Some(raw) => TaskStatus::from_str(raw)
                .map_err(|_| errors.push(validation::INVALID_STATUS.to_owned()))
                .ok(),
            None => None,
        };
        let priority = match non_blank(priority) {
            Some(raw) => TaskPriority::from_str(raw)
                .map_err(|_| errors.push(validation::INVALID_PRIORITY.to_owned()))
                .ok(),
            None => None,
        };
        if errors.is_empty() {
            Ok(Self { status, priority })
        } else {
            Err(TaskError::Invalid(errors))
        }
    }

    /// The filter as forwarded to the persistence workflow.
    pub fn to_json(&self) -> Value {
        let mut filters = Map::new();
        if let Some(status) = self.status {
            filters.insert("status".into(), Value::String(status.to_string()));
        }
        if let Some(priority) = self.priority {
            filters.insert("priority".into(), Value::String(priority.to_string()));
        }
        Value::Object(filters)
    }

    /// Whether a stored record (as returned by the remote store) passes.
    pub fn matches_record(&self, record: &Value) -> bool {
        let field_is = |name: &str, expected: &str| {
            record.get(name).and_then(Value::as_str) == Some(expected)
        };
        self.status.is_none_or(|s| field_is("status", s.as_ref()))
            && self.priority.is_none_or(|p| field_is("priority", p.as_ref()))
    }
}

/// Sort key of the task list: priority rank first, then earliest deadline,
/// tasks without a deadline after those with one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgendaKey {
    rank: u8,
    deadline: Option<DateTime<Utc>>,
}

impl AgendaKey {
    /// Key for a loosely-shaped stored record. Unknown priorities sort last.
    pub fn of_record(record: &Value) -> Self {
        let rank = record
            .get("priority")
            .and_then(Value::as_str)
            .and_then(|raw| TaskPriority::from_str(raw).ok())
            .map_or(u8::MAX, TaskPriority::rank);
        let deadline = record
            .get("deadline")
            .and_then(Value::as_str)
            .and_then(parse_timestamp);
        Self { rank, deadline }
    }
}

impl Ord for AgendaKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank).then_with(|| match (self.deadline, other.deadline) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
    }
}

impl PartialOrd for AgendaKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
