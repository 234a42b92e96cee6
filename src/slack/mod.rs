//! Slack bot that answers number messages with their square root.
//!
//! Runs over Socket Mode, so the service needs no public inbound URL for
//! Slack: it opens an outbound WebSocket and receives events on it.

mod backend;
mod events;
mod reply;
mod socket;
mod web;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

pub use backend::*;
pub use web::*;

use crate::config::SlackConfig;
use crate::error::{ApiError, ApiResult};

/// Bot state published to the health endpoint.
#[derive(Debug, Default)]
pub struct BotStatus {
    pub enabled: AtomicBool,
    pub connected: AtomicBool,
    pub reconnects: AtomicU64,
}

impl BotStatus {
    /// Status for a deployment without Slack tokens.
    pub fn disabled() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `disabled`, `connecting` or `running`.
    pub fn state(&self) -> &'static str {
        if !self.enabled.load(Ordering::Relaxed) {
            "disabled"
        } else if self.connected.load(Ordering::Relaxed) {
            "running"
        } else {
            "connecting"
        }
    }
}

/// A configured Slack bot, ready to be spawned.
#[derive(Clone)]
pub struct SlackBot {
    web: SlackWebClient,
    backend: SqrtBackend,
    status: Arc<BotStatus>,
    reconnect_delay_secs: u64,
    reconnect_max_delay_secs: u64,
}

impl SlackBot {
    /// Build the bot from configuration.
    ///
    /// Returns `Ok(None)` when either token is missing: the bot is optional.
    pub fn from_config(config: &SlackConfig) -> ApiResult<Option<Self>> {
        let Some((bot_token, app_token)) = config.tokens() else {
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let backend = match config.api_url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => SqrtBackend::Remote(RemoteSqrtApi::new(
                client.clone(),
                url,
                config.api_token.clone(),
                config.api_key.clone(),
            )),
            None => SqrtBackend::Local,
        };

        let status = Arc::new(BotStatus::default());
        status.enabled.store(true, Ordering::Relaxed);

        Ok(Some(Self {
            web: SlackWebClient::new(client, bot_token, app_token),
            backend,
            status,
            reconnect_delay_secs: config.reconnect_delay_secs,
            reconnect_max_delay_secs: config.reconnect_max_delay_secs,
        }))
    }

    /// Shared status handle for the health endpoint.
    pub fn status(&self) -> Arc<BotStatus> {
        self.status.clone()
    }

    /// Which backend computes the roots.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Spawn the connection loop. Runs until the handle is aborted.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tokens_disable_bot() {
        let config = SlackConfig::default();
        assert!(SlackBot::from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_backend_selection() {
        let mut config = SlackConfig {
            bot_token: Some("xoxb-1".to_string()),
            app_token: Some("xapp-1".to_string()),
            ..SlackConfig::default()
        };
        let bot = SlackBot::from_config(&config).unwrap().unwrap();
        assert_eq!(bot.backend_name(), "local");
        assert_eq!(bot.status().state(), "connecting");

        config.api_url = Some("https://sqrt.example.com".to_string());
        let bot = SlackBot::from_config(&config).unwrap().unwrap();
        assert_eq!(bot.backend_name(), "remote");
    }

    #[test]
    fn test_status_states() {
        let status = BotStatus::disabled();
        assert_eq!(status.state(), "disabled");

        status.enabled.store(true, Ordering::Relaxed);
        assert_eq!(status.state(), "connecting");

        status.connected.store(true, Ordering::Relaxed);
        assert_eq!(status.state(), "running");
    }
}
