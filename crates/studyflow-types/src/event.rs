//! Timetable events.
//!
//! Events are read-only sample data for now: [`sample_events`] lays out a
//! week of classes, meetings and deadlines relative to a given day.

use std::str::FromStr;

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

use crate::task::TaskPriority;

/// Where an event originated.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, ToSchema, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventSource {
    College,
    Manual,
    Outlook,
    Google,
}

/// What kind of entry an event is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, ToSchema, Display, AsRefStr, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventKind {
    Class,
    Lab,
    Meeting,
    Deadline,
    Appointment,
    Study,
    Task,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(with = "crate::time::iso_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub start_time: DateTime<Utc>,
    #[serde(with = "crate::time::iso_millis")]
    #[schema(value_type = String, format = DateTime)]
    pub end_time: DateTime<Utc>,
    pub source: EventSource,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

/// Timetable view filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    All,
    /// Events of kind [`EventKind::Deadline`].
    Deadlines,
    /// Events starting within the next [`UPCOMING_WINDOW_DAYS`] days.
    Upcoming,
    Source(EventSource),
}

pub const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event filter '{0}'")]
pub struct UnknownEventFilter(pub String);

impl FromStr for EventFilter {
    type Err = UnknownEventFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(EventFilter::All),
            "deadlines" => Ok(EventFilter::Deadlines),
            "upcoming" => Ok(EventFilter::Upcoming),
            other => EventSource::from_str(other)
                .map(EventFilter::Source)
                .map_err(|_| UnknownEventFilter(other.to_owned())),
        }
    }
}

impl EventFilter {
    pub fn matches(&self, event: &Event, now: DateTime<Utc>) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Deadlines => event.kind == EventKind::Deadline,
            EventFilter::Upcoming => starts_within_window(event, now),
            EventFilter::Source(source) => event.source == *source,
        }
    }
}

fn starts_within_window(event: &Event, now: DateTime<Utc>) -> bool {
    let horizon = now + Duration::days(UPCOMING_WINDOW_DAYS);
    event.start_time >= now && event.start_time <= horizon
}

/// Apply `filter` and order by start time, earliest first.
pub fn select(events: Vec<Event>, filter: EventFilter, now: DateTime<Utc>) -> Vec<Event> {
    let mut selected: Vec<Event> = events
        .into_iter()
        .filter(|event| filter.matches(event, now))
        .collect();
    selected.sort_by_key(|event| event.start_time);
    selected
}

/// Deadlines starting within the upcoming window, earliest first.
pub fn upcoming_deadlines(events: Vec<Event>, now: DateTime<Utc>) -> Vec<Event> {
    let mut deadlines: Vec<Event> = events
        .into_iter()
        .filter(|event| event.kind == EventKind::Deadline && starts_within_window(event, now))
        .collect();
    deadlines.sort_by_key(|event| event.start_time);
    deadlines
}

/// A fixed week of sample events, dated relative to `today` (UTC).
pub fn sample_events(today: NaiveDate) -> Vec<Event> {
    let at = |days: u64, hour: u32, minute: u32| -> DateTime<Utc> {
        today
            .checked_add_days(Days::new(days))
            .and_then(|day| day.and_hms_opt(hour, minute, 0))
            .map(|naive| naive.and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    };

    let event = |id: u32,
                 title: &str,
                 description: &str,
                 start: DateTime<Utc>,
                 end: DateTime<Utc>,
                 source: EventSource,
                 kind: EventKind,
                 location: &str| Event {
        id,
        title: title.to_owned(),
        description: description.to_owned(),
        start_time: start,
        end_time: end,
        source,
        kind,
        location: Some(location.to_owned()),
        priority: None,
    };

    vec![
        event(
            1,
            "Data Structures Lecture",
            "Arrays and Linked Lists",
            at(1, 9, 0),
            at(1, 10, 30),
            EventSource::College,
            EventKind::Class,
            "Room 204",
        ),
        event(
            2,
            "Project X Development",
            "Work on landing page and timetable features",
            at(1, 14, 0),
            at(1, 16, 0),
            EventSource::Manual,
            EventKind::Task,
            "Home",
        ),
        event(
            3,
            "Team Meeting",
            "Weekly sync with development team",
            at(2, 10, 0),
            at(2, 11, 0),
            EventSource::Outlook,
            EventKind::Meeting,
            "Microsoft Teams",
        ),
        Event {
            priority: Some(TaskPriority::High),
            ..event(
                4,
                "Assignment Deadline: Algorithm Design",
                "Submit dynamic programming solutions",
                at(3, 23, 59),
                at(3, 23, 59),
                EventSource::College,
                EventKind::Deadline,
                "Online Submission",
            )
        },
        event(
            5,
            "Database Management Lab",
            "SQL Queries and Optimization",
            at(2, 15, 0),
            at(2, 17, 0),
            EventSource::College,
            EventKind::Lab,
            "Computer Lab 3",
        ),
        event(
            6,
            "Google Calendar Sync Test",
            "Personal reminder for doctor appointment",
            at(4, 11, 0),
            at(4, 12, 0),
            EventSource::Google,
            EventKind::Appointment,
            "City Hospital",
        ),
        Event {
            priority: Some(TaskPriority::High),
            ..event(
                7,
                "Midterm Exam: Operating Systems",
                "Chapters 1-5: Process Management and Scheduling",
                at(5, 9, 0),
                at(5, 11, 0),
                EventSource::College,
                EventKind::Deadline,
                "Exam Hall A",
            )
        },
        event(
            8,
            "Group Study Session",
            "Prepare for OS midterm",
            at(4, 18, 0),
            at(4, 20, 0),
            EventSource::Manual,
            EventKind::Study,
            "Library",
        ),
    ]
}
