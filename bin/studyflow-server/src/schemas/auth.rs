use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AuthMode;

/// What a front end needs to decide whether to mount the sign-in provider.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfigResponse {
    /// `enabled` or `disabled`.
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publishable_key: Option<String>,
}

impl From<&AuthMode> for AuthConfigResponse {
    fn from(mode: &AuthMode) -> Self {
        let publishable_key = match mode {
            AuthMode::Disabled => None,
            AuthMode::Enabled { publishable_key } => Some(publishable_key.clone()),
        };
        Self {
            mode: mode.as_str().to_owned(),
            publishable_key,
        }
    }
}
