//! Shared domain types for studyflow.
//!
//! This crate owns everything about a task or event that does not involve
//! I/O: the wire shapes, the validation contract, the construction rules the
//! HTTP layer applies before forwarding a record, and the orderings and
//! filters the task list and timetable views rely on.

pub mod error;
pub mod event;
pub mod task;
pub mod time;
pub mod validation;

pub use error::TaskError;
pub use event::{Event, EventFilter, EventKind, EventSource};
pub use task::{AgendaKey, Task, TaskFilter, TaskInput, TaskPriority, TaskStatus};
pub use validation::validate;
