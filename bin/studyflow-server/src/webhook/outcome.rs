use serde::Serialize;
use utoipa::ToSchema;

use super::WebhookError;

/// Whether a mutation forwarded to the webhook is known to be durable.
///
/// Mutations are answered optimistically either way; this records what the
/// webhook actually said so it can be logged and, when configured, returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum PersistenceOutcome {
    Confirmed,
    NotConfigured,
    Unconfirmed { reason: String },
}

impl PersistenceOutcome {
    pub fn of<T>(result: &Result<T, WebhookError>) -> Self {
        match result {
            Ok(_) => PersistenceOutcome::Confirmed,
            Err(WebhookError::NotConfigured) => PersistenceOutcome::NotConfigured,
            Err(e) => PersistenceOutcome::Unconfirmed {
                reason: e.to_string(),
            },
        }
    }
}
