//! Minimal Slack Web API client.
//!
//! Only the two calls the bot needs: opening a Socket Mode connection and
//! posting a threaded reply.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Common shape of Slack Web API responses.
#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    /// Set by `apps.connections.open`.
    #[serde(default)]
    url: Option<String>,
}

impl SlackResponse {
    fn into_result(self, method: &str) -> ApiResult<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(ApiError::Slack(format!(
                "{} failed: {}",
                method,
                self.error.as_deref().unwrap_or("unknown_error")
            )))
        }
    }
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
    thread_ts: &'a str,
}

/// Slack Web API client holding the bot and app tokens.
#[derive(Clone)]
pub struct SlackWebClient {
    client: Client,
    base_url: String,
    bot_token: String,
    app_token: String,
}

impl SlackWebClient {
    /// Create a client against the public Slack API.
    pub fn new(client: Client, bot_token: &str, app_token: &str) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL, bot_token, app_token)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(client: Client, base_url: &str, bot_token: &str, app_token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
            app_token: app_token.to_string(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Request a fresh Socket Mode WebSocket URL.
    ///
    /// POST apps.connections.open, authenticated with the app-level token.
    pub async fn open_connection(&self) -> ApiResult<String> {
        let response: SlackResponse = self
            .client
            .post(self.endpoint("apps.connections.open"))
            .bearer_auth(&self.app_token)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .send()
            .await
            .map_err(|e| ApiError::Slack(format!("apps.connections.open request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| ApiError::Slack(format!("apps.connections.open bad response: {}", e)))?;

        response
            .into_result("apps.connections.open")?
            .url
            .ok_or_else(|| ApiError::Slack("apps.connections.open returned no url".to_string()))
    }

    /// Post `text` as a reply in the thread rooted at `thread_ts`.
    pub async fn post_reply(&self, channel: &str, thread_ts: &str, text: &str) -> ApiResult<()> {
        let request = PostMessageRequest {
            channel,
            text,
            thread_ts,
        };

        let response: SlackResponse = self
            .client
            .post(self.endpoint("chat.postMessage"))
            .bearer_auth(&self.bot_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Slack(format!("chat.postMessage request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| ApiError::Slack(format!("chat.postMessage bad response: {}", e)))?;

        response.into_result("chat.postMessage")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = SlackWebClient::with_base_url(
            Client::new(),
            "http://localhost:9999/api/",
            "xoxb-1",
            "xapp-1",
        );
        assert_eq!(
            client.endpoint("chat.postMessage"),
            "http://localhost:9999/api/chat.postMessage"
        );
    }

    #[test]
    fn test_error_response_is_reported() {
        let response: SlackResponse =
            serde_json::from_str(r#"{"ok":false,"error":"invalid_auth"}"#).unwrap();
        let err = response.into_result("chat.postMessage").unwrap_err();
        assert!(err.to_string().contains("invalid_auth"));
    }

    #[test]
    fn test_connection_url_is_extracted() {
        let response: SlackResponse =
            serde_json::from_str(r#"{"ok":true,"url":"wss://wss-primary.slack.com/link/?ticket=1"}"#)
                .unwrap();
        let response = response.into_result("apps.connections.open").unwrap();
        assert_eq!(
            response.url.as_deref(),
            Some("wss://wss-primary.slack.com/link/?ticket=1")
        );
    }

    #[test]
    fn test_post_message_body() {
        let body = serde_json::to_value(PostMessageRequest {
            channel: "C1",
            text: "√16.0 = 4.0",
            thread_ts: "1.2",
        })
        .unwrap();
        assert_eq!(body["channel"], "C1");
        assert_eq!(body["thread_ts"], "1.2");
    }
}
