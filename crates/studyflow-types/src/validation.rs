//! The task validation contract.
//!
//! [`validate`] checks every rule independently and returns all violations
//! together; an empty list means the input is well-formed.

use crate::task::{TaskInput, TaskPriority, TaskStatus};
use crate::time::parse_timestamp;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_MEETING_LINK_CHARS: usize = 500;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const TITLE_TOO_LONG: &str = "Title must be 200 characters or less";
pub const DESCRIPTION_TOO_LONG: &str = "Description must be 1000 characters or less";
pub const INVALID_PRIORITY: &str = "Invalid priority value";
pub const INVALID_STATUS: &str = "Invalid status value";
pub const INVALID_DEADLINE: &str = "Invalid deadline date";
pub const MEETING_LINK_TOO_LONG: &str = "Meeting link must be 500 characters or less";

/// Validate a candidate task. Never fails; violations are returned in rule
/// order.
pub fn validate(input: &TaskInput) -> Vec<String> {
    let mut errors = Vec::new();

    match non_blank(input.title.as_deref()) {
        None => errors.push(TITLE_REQUIRED.to_owned()),
        Some(title) if title.trim().chars().count() > MAX_TITLE_CHARS => {
            errors.push(TITLE_TOO_LONG.to_owned())
        }
        Some(_) => {}
    }

    if input
        .description
        .as_deref()
        .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_CHARS)
    {
        errors.push(DESCRIPTION_TOO_LONG.to_owned());
    }

    if non_blank(input.priority.as_deref()).is_some_and(|p| p.parse::<TaskPriority>().is_err()) {
        errors.push(INVALID_PRIORITY.to_owned());
    }

    if non_blank(input.status.as_deref()).is_some_and(|s| s.parse::<TaskStatus>().is_err()) {
        errors.push(INVALID_STATUS.to_owned());
    }

    if non_blank(input.deadline.as_deref()).is_some_and(|d| parse_timestamp(d).is_none()) {
        errors.push(INVALID_DEADLINE.to_owned());
    }

    if input
        .meeting_link
        .as_deref()
        .is_some_and(|l| l.chars().count() > MAX_MEETING_LINK_CHARS)
    {
        errors.push(MEETING_LINK_TOO_LONG.to_owned());
    }

    errors
}

/// `Some` only for values that contain something other than whitespace.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
