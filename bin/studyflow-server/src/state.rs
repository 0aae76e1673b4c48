//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::webhook::{PersistenceOutcome, WebhookClient, WebhookError};

/// State shared across all HTTP handlers. Built once at startup; handlers
/// never touch the process environment.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Adapter for the task persistence workflow.
    pub webhook: Arc<WebhookClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, WebhookError> {
        let webhook = WebhookClient::new(config.webhook_url.as_deref(), config.webhook_timeout)?;
        Ok(Self {
            config: Arc::new(config),
            webhook: Arc::new(webhook),
        })
    }

    /// The outcome as it should appear in a response body, if at all.
    pub fn visible_outcome(&self, outcome: PersistenceOutcome) -> Option<PersistenceOutcome> {
        self.config.surface_persistence.then_some(outcome)
    }
}
