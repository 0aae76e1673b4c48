//! Normalization of the webhook's read responses.
//!
//! The automation workflow answers a `read` differently depending on which
//! branch it took: a find step returns a bare array, other steps wrap the
//! records in `tasks` or `documents`, and an empty result may come back as
//! anything at all. [`ReadShape`] discriminates these before they collapse
//! into one [`TaskListing`].

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReadShape {
    BareArray(Vec<Value>),
    TasksWrapper { tasks: Vec<Value> },
    DocumentsWrapper { documents: Vec<Value> },
    /// Any other body, including `null` and objects without a record array.
    Empty(IgnoredAny),
}

impl ReadShape {
    pub fn from_body(body: Value) -> Self {
        serde_json::from_value(body).unwrap_or(ReadShape::Empty(IgnoredAny))
    }
}

/// Canonical result of a read.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TaskListing {
    pub success: bool,
    pub tasks: Vec<Value>,
    pub count: usize,
}

impl TaskListing {
    pub fn new(tasks: Vec<Value>) -> Self {
        Self {
            success: true,
            count: tasks.len(),
            tasks,
        }
    }

    pub fn from_body(body: Value) -> Self {
        ReadShape::from_body(body).into()
    }
}

impl From<ReadShape> for TaskListing {
    fn from(shape: ReadShape) -> Self {
        match shape {
            ReadShape::BareArray(tasks)
            | ReadShape::TasksWrapper { tasks }
            | ReadShape::DocumentsWrapper { documents: tasks } => TaskListing::new(tasks),
            ReadShape::Empty(_) => TaskListing::new(Vec::new()),
        }
    }
}

/// Flatten one listed item into the stored task record.
///
/// Workflow items may arrive wrapped in an execution envelope
/// (`{"json": {"documents": [record]}}` after an insert, `{"json": record}`
/// otherwise). Bare records pass through; `null` items are dropped.
pub fn unwrap_record(item: Value) -> Option<Value> {
    match item {
        Value::Null => None,
        Value::Object(mut fields) => match fields.remove("json") {
            Some(Value::Object(mut inner)) => {
                if let Some(Value::Array(documents)) = inner.get_mut("documents") {
                    if !documents.is_empty() {
                        return Some(documents.swap_remove(0));
                    }
                }
                Some(Value::Object(inner))
            }
            Some(other) => {
                fields.insert("json".to_owned(), other);
                Some(Value::Object(fields))
            }
            None => Some(Value::Object(fields)),
        },
        other => Some(other),
    }
}
