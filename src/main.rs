//! Square Root API
//!
//! Serves `GET /sqrt/{number}` behind an optional shared-secret gate, and
//! optionally runs a Slack bot that answers number messages in-thread.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod slack;

use crate::api::build_router;
use crate::auth::ApiKeyValidator;
use crate::config::Config;
use crate::slack::{BotStatus, SlackBot};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Slack bot status, reported by the health endpoint.
    pub bot_status: Arc<BotStatus>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    logging::init();

    tracing::info!("Starting Square Root API v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    config.validate().map_err(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        anyhow::anyhow!("{}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        auth_enabled = %config.auth.enabled,
        "Configuration loaded"
    );

    // Authentication
    let api_key_validator = match config.auth.key() {
        Some(key) if config.auth.enabled => {
            let validator = ApiKeyValidator::new(key);
            tracing::info!(
                key_fingerprint = %validator.fingerprint(),
                "API key authentication enabled"
            );
            Some(validator)
        }
        _ => {
            tracing::warn!("Authentication is DISABLED - enable for production");
            None
        }
    };

    // Slack bot
    let bot = SlackBot::from_config(&config.slack).map_err(|e| {
        tracing::error!(error = %e, "Failed to set up Slack bot");
        anyhow::anyhow!("{}", e)
    })?;

    let (bot_status, bot_task) = match bot {
        Some(bot) => {
            tracing::info!(backend = bot.backend_name(), "Starting Slack bot");
            (bot.status(), Some(bot.spawn()))
        }
        None => {
            tracing::warn!("Set SLACK_BOT_TOKEN and SLACK_APP_TOKEN to enable the Slack bot");
            (BotStatus::disabled(), None)
        }
    };

    let state = AppState { bot_status };
    let app = build_router(state, api_key_validator);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = bot_task {
        task.abort();
    }

    tracing::info!("Server stopped");

    Ok(())
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
