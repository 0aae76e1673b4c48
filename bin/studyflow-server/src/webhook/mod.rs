//! Client for the automation webhook that persists tasks.
//!
//! Every operation is a single JSON `POST` to one configured URL. The body is
//! the caller's payload wrapped in an envelope naming the `action`, the record
//! `type` and the time of the call; the workflow behind the URL routes on
//! `action` and talks to the document store. Calls are made once: there is no
//! retry and, unless a timeout is configured, no deadline.

mod error;
mod outcome;
mod shape;

pub use error::WebhookError;
pub use outcome::PersistenceOutcome;
pub use shape::{TaskListing, unwrap_record};

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde_json::{Map, Value, json};
use strum::{AsRefStr, Display};
use studyflow_types::time::format_timestamp;
use tracing::{debug, info, warn};

/// Operation discriminator understood by the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum WebhookAction {
    Create,
    Read,
    Update,
    Delete,
}

/// Result of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutput {
    /// Normalized records, for [`WebhookAction::Read`].
    Listing(TaskListing),
    /// The workflow's body, unchanged, for every other action.
    Body(Value),
}

#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    target: Option<Url>,
}

impl WebhookClient {
    /// Build a client for `url`. `None` yields a client whose every call
    /// short-circuits with [`WebhookError::NotConfigured`].
    pub fn new(url: Option<&str>, timeout: Option<Duration>) -> Result<Self, WebhookError> {
        let target = url.map(parse_target).transpose()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            target,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.target.is_some()
    }

    /// Send `payload` to the workflow as `action`.
    ///
    /// Fails without a network call when unconfigured; fails with the remote
    /// status when the workflow answers non-2xx.
    pub async fn call(
        &self,
        action: WebhookAction,
        payload: Value,
    ) -> Result<WebhookOutput, WebhookError> {
        let Some(target) = &self.target else {
            debug!(%action, "webhook not configured; skipping call");
            return Err(WebhookError::NotConfigured);
        };

        let body = envelope(action, payload, Utc::now());
        debug!(%action, url = %target, "calling webhook");

        let response = self
            .http
            .post(target.clone())
            .json(&body)
            .send()
            .await
            .inspect_err(|e| warn!(%action, error = %e, "webhook request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(%action, status = status.as_u16(), body = %text, "webhook returned error status");
            return Err(WebhookError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            });
        }

        let bytes = response.bytes().await?;
        let body: Value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .inspect_err(|e| warn!(%action, error = %e, "webhook body is not JSON"))?
        };
        info!(%action, status = status.as_u16(), "webhook call succeeded");

        Ok(match action {
            WebhookAction::Read => WebhookOutput::Listing(TaskListing::from_body(body)),
            _ => WebhookOutput::Body(body),
        })
    }

    /// Fetch the stored tasks matching `filters`.
    pub async fn read(&self, filters: Value) -> Result<TaskListing, WebhookError> {
        match self.call(WebhookAction::Read, json!({ "filters": filters })).await? {
            WebhookOutput::Listing(listing) => Ok(listing),
            WebhookOutput::Body(body) => Ok(TaskListing::from_body(body)),
        }
    }

    /// Forward a mutation and return the workflow's answer.
    pub async fn send(&self, action: WebhookAction, payload: Value) -> Result<Value, WebhookError> {
        match self.call(action, payload).await? {
            WebhookOutput::Body(body) => Ok(body),
            WebhookOutput::Listing(listing) => Ok(serde_json::to_value(listing)?),
        }
    }
}

fn parse_target(raw: &str) -> Result<Url, WebhookError> {
    let invalid = |reason: String| WebhookError::InvalidUrl {
        url: raw.to_owned(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(invalid(format!("unsupported scheme '{scheme}'"))),
    }
}

/// `{action, type: "task", ...payload, timestamp}`. Payload fields may shadow
/// `action` and `type`; the timestamp is always the adapter's. A non-object
/// payload is carried under `data`.
fn envelope(action: WebhookAction, payload: Value, at: DateTime<Utc>) -> Value {
    let mut body = Map::new();
    body.insert("action".to_owned(), Value::String(action.to_string()));
    body.insert("type".to_owned(), Value::String("task".to_owned()));
    match payload {
        Value::Object(fields) => body.extend(fields),
        Value::Null => {}
        other => {
            body.insert("data".to_owned(), other);
        }
    }
    body.insert("timestamp".to_owned(), Value::String(format_timestamp(&at)));
    Value::Object(body)
}
