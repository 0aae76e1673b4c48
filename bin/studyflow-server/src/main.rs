//! studyflow-server – entry point.
//!
//! Startup order:
//! 1. Parse configuration from environment variables.
//! 2. Initialise structured tracing (JSON in production, pretty in dev).
//! 3. Build the shared state: the task webhook client and the resolved auth mode.
//! 4. Serve the task and timetable API until SIGINT or SIGTERM, then drain.

mod config;
mod error;
mod middleware;
mod routes;
mod schemas;
mod state;
mod webhook;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Configuration ───────────────────────────────────────────────────────
    let cfg = Config::from_env();

    // ── 2. Tracing ─────────────────────────────────────────────────────────────
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => match cfg.log_level.parse::<tracing_subscriber::EnvFilter>() {
            Ok(f) => f,
            Err(e) => {
                eprintln!(
                    "WARN: STUDYFLOW_LOG='{}' is not a valid tracing filter ({}); \
                     falling back to 'info'",
                    cfg.log_level, e
                );
                tracing_subscriber::EnvFilter::new("info")
            }
        },
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true);

    if cfg.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %cfg.bind_address,
        log_json = cfg.log_json,
        "studyflow-server starting"
    );

    // ── 3. Shared application state ────────────────────────────────────────────
    // An unparsable webhook URL aborts startup.
    let state = Arc::new(AppState::new(cfg.clone())?);
    info!(
        webhook = if state.webhook.is_configured() { "configured" } else { "disabled" },
        webhook_timeout_secs = cfg.webhook_timeout.map(|t| t.as_secs()),
        surface_persistence = cfg.surface_persistence,
        auth = cfg.auth.as_str(),
        swagger = cfg.enable_swagger,
        "task persistence resolved"
    );
    if !state.webhook.is_configured() {
        warn!("STUDYFLOW_WEBHOOK_URL not set; tasks are accepted but never stored");
    }

    // ── 4. HTTP server with graceful shutdown ──────────────────────────────────
    let app = routes::build(Arc::clone(&state));
    let addr: SocketAddr = cfg.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving /api/tasks and /api/events");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let signal = shutdown_signal().await;
            info!(signal, "draining in-flight requests");
        })
        .await?;

    info!("studyflow-server stopped");
    Ok(())
}

/// Resolves with the name of the first termination signal received.
///
/// A handler that cannot be installed never fires; the other still can.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!(error = %e, "failed to install CTRL+C signal handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = ctrl_c => name,
        name = terminate => name,
    }
}
