use thiserror::Error;

/// Errors produced while turning caller input into a canonical [`crate::Task`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// An update was requested without naming the task to update.
    #[error("Task ID is required for updates")]
    MissingId,

    /// One or more field constraints failed. Every violation is listed.
    #[error("invalid task: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl TaskError {
    /// The itemized, human-readable violations carried by this error.
    pub fn messages(&self) -> Vec<String> {
        match self {
            TaskError::MissingId => vec![self.to_string()],
            TaskError::Invalid(errors) => errors.clone(),
        }
    }
}
