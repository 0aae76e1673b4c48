use thiserror::Error;

/// Errors returned by [`super::WebhookClient`].
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No webhook URL was configured; the call was not attempted.
    #[error("webhook is not configured")]
    NotConfigured,

    /// The configured URL is not an absolute http(s) URL.
    #[error("invalid webhook URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request could not be sent or its body could not be read
    /// (connection refused, DNS failure, timeout, ...).
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The workflow answered with a non-2xx status.
    #[error("webhook workflow failed: {status} {reason}")]
    Status { status: u16, reason: String },

    /// The workflow answered 2xx with a body that is not JSON.
    #[error("webhook returned malformed JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
