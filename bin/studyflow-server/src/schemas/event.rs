use serde::{Deserialize, Serialize};
use serde_json::Value;
use studyflow_types::Event;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct EventListQuery {
    /// `all`, `deadlines`, `upcoming`, or a source
    /// (`college`, `manual`, `outlook`, `google`).
    pub filter: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EventCreatedResponse {
    pub message: String,
    /// The submitted event, echoed back unchanged.
    pub event: Value,
}
