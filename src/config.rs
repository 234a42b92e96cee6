//! Configuration module for the Square Root API.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Conventional environment variables set by hosting platforms and the
/// Slack app setup guide, mapped onto configuration keys.
const PLATFORM_ENV_VARS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("API_KEY", "auth.api_key"),
    ("SLACK_BOT_TOKEN", "slack.bot_token"),
    ("SLACK_APP_TOKEN", "slack.app_token"),
    ("SQRT_API_URL", "slack.api_url"),
];

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub slack: SlackConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// API-key authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Whether protected routes require the `X-API-Key` header.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// The shared secret. Required when `enabled` is true.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Slack Socket Mode bot configuration.
#[derive(Clone, Deserialize)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`) used for `chat.postMessage`.
    #[serde(default)]
    pub bot_token: Option<String>,
    /// App-level token (`xapp-...`) used to open Socket Mode connections.
    #[serde(default)]
    pub app_token: Option<String>,
    /// Base URL of a remote Square Root API. When unset the bot computes locally.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Bearer token sent to the remote API (platform OAuth token).
    #[serde(default)]
    pub api_token: Option<String>,
    /// `X-API-Key` sent to the remote API.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Initial reconnect delay in seconds.
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: u64,
    /// Upper bound for the exponential reconnect delay.
    #[serde(default = "default_reconnect_max_delay")]
    pub reconnect_max_delay_secs: u64,
    /// Timeout for Slack Web API and remote API calls.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_true() -> bool {
    true
}

fn default_reconnect_delay() -> u64 {
    1
}

fn default_reconnect_max_delay() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
        }
    }
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            app_token: None,
            api_url: None,
            api_token: None,
            api_key: None,
            reconnect_delay_secs: default_reconnect_delay(),
            reconnect_max_delay_secs: default_reconnect_max_delay(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("app_token", &self.app_token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("reconnect_delay_secs", &self.reconnect_delay_secs)
            .field("reconnect_max_delay_secs", &self.reconnect_max_delay_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl AuthConfig {
    /// The configured key, treating an empty string as absent.
    pub fn key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl SlackConfig {
    /// Both tokens, if the bot is configured.
    pub fn tokens(&self) -> Option<(&str, &str)> {
        let bot = self.bot_token.as_deref().filter(|t| !t.is_empty())?;
        let app = self.app_token.as_deref().filter(|t| !t.is_empty())?;
        Some((bot, app))
    }
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SQRT_API__*)
    /// 2. Platform environment variables (API_KEY, SLACK_BOT_TOKEN, ...)
    /// 3. config/local.yaml (if exists)
    /// 4. config/default.yaml (if exists)
    pub fn load() -> Result<Self, ConfigError> {
        let platform = PLATFORM_ENV_VARS
            .iter()
            .filter_map(|(var, key)| std::env::var(var).ok().map(|value| (*key, value)));

        Self::build(platform)
    }

    fn build<'a>(
        platform: impl IntoIterator<Item = (&'a str, String)>,
    ) -> Result<Self, ConfigError> {
        let platform: config::Map<String, config::Value> = platform
            .into_iter()
            .map(|(key, value)| (key.to_string(), config::Value::from(value)))
            .collect();

        let config = ConfigLoader::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on conventional platform variables
            .add_source(PlatformEnv(platform))
            // Layer on environment variables with SQRT_API prefix
            .add_source(
                Environment::with_prefix("SQRT_API")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Enforce the fail-closed authentication rule.
    ///
    /// Authentication is on unless explicitly disabled, and when it is on a
    /// non-empty key must be configured.
    pub fn validate(&self) -> Result<(), crate::error::ApiError> {
        if self.auth.enabled && self.auth.key().is_none() {
            return Err(crate::error::ApiError::Config(
                "auth.enabled is true but no API key is configured \
                 (set API_KEY or SQRT_API__AUTH__API_KEY, or set SQRT_API__AUTH__ENABLED=false)"
                    .to_string(),
            ));
        }

        if self.slack.reconnect_delay_secs == 0
            || self.slack.reconnect_max_delay_secs < self.slack.reconnect_delay_secs
        {
            return Err(crate::error::ApiError::Config(
                "slack.reconnect_delay_secs must be positive and not exceed reconnect_max_delay_secs"
                    .to_string(),
            ));
        }

        Ok(())
    }
}

/// A fixed set of key/value pairs exposed as a configuration source.
#[derive(Debug, Clone)]
struct PlatformEnv(config::Map<String, config::Value>);

impl config::Source for PlatformEnv {
    fn clone_into_box(&self) -> Box<dyn config::Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, ConfigError> {
        Ok(self.0.clone())
    }
}
