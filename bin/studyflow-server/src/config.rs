//! Server configuration, loaded from environment variables at startup.

use std::time::Duration;

/// Whether the authentication provider wrapper is active.
///
/// Resolved once at startup. A front end asks `/api/auth/config` which mode
/// is in effect instead of inspecting the key itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    Disabled,
    Enabled { publishable_key: String },
}

impl AuthMode {
    /// Resolve the mode from the provider's publishable key.
    ///
    /// A missing or blank key, or an explicit `force_disabled`, yields
    /// [`AuthMode::Disabled`].
    pub fn resolve(publishable_key: Option<String>, force_disabled: bool) -> Self {
        match publishable_key {
            Some(key) if !force_disabled && !key.trim().is_empty() => AuthMode::Enabled {
                publishable_key: key.trim().to_owned(),
            },
            _ => AuthMode::Disabled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Disabled => "disabled",
            AuthMode::Enabled { .. } => "enabled",
        }
    }
}

/// Runtime configuration for studyflow-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set; without a webhook URL tasks are
/// accepted but never persisted.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// Automation webhook that persists tasks. `None` disables persistence.
    pub webhook_url: Option<String>,

    /// Upper bound on a single webhook call. `None` waits indefinitely.
    pub webhook_timeout: Option<Duration>,

    pub auth: AuthMode,

    /// When `true`, mutation responses carry a `persistence` object saying
    /// whether the webhook confirmed the write.
    pub surface_persistence: bool,

    /// Comma-separated list of allowed CORS origins. `None` allows any.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI at `/swagger-ui` (default: `true`).
    pub enable_swagger: bool,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_owned(),
            webhook_url: None,
            webhook_timeout: None,
            auth: AuthMode::Disabled,
            surface_persistence: false,
            cors_allowed_origins: None,
            enable_swagger: true,
            log_level: "info".to_owned(),
            log_json: false,
        }
    }
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build [`Config`] from an arbitrary key lookup. Blank values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let flag = |key: &str, default: bool| get(key).map_or(default, |v| parse_bool(&v));
        let defaults = Self::default();

        Self {
            bind_address: get("STUDYFLOW_BIND").unwrap_or(defaults.bind_address),
            webhook_url: get("STUDYFLOW_WEBHOOK_URL").map(|v| v.trim().to_owned()),
            webhook_timeout: get("STUDYFLOW_WEBHOOK_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            auth: AuthMode::resolve(
                get("STUDYFLOW_AUTH_PUBLISHABLE_KEY"),
                flag("STUDYFLOW_AUTH_DISABLED", false),
            ),
            surface_persistence: flag("STUDYFLOW_SURFACE_PERSISTENCE", false),
            cors_allowed_origins: get("STUDYFLOW_CORS_ORIGINS"),
            enable_swagger: flag("STUDYFLOW_ENABLE_SWAGGER", true),
            log_level: get("STUDYFLOW_LOG").unwrap_or(defaults.log_level),
            log_json: flag("STUDYFLOW_LOG_JSON", false),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn parse_bool(raw: &str) -> bool {
    let raw = raw.trim();
    raw == "1" || raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("yes")
}
