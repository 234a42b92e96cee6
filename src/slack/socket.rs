//! Socket Mode connection loop.
//!
//! Maintains an outbound WebSocket to Slack with exponential-backoff
//! reconnect, acknowledges every envelope and answers number messages in
//! their thread.

use std::sync::atomic::Ordering;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::domain::parse_number;
use crate::slack::events::{Envelope, Incoming, MessageEvent};
use crate::slack::reply::{format_reply, is_number_message};
use crate::slack::SlackBot;

/// Reason a connection ended without error.
enum DisconnectReason {
    /// Slack sent a `disconnect` envelope; reconnect without backoff.
    Refresh,
    /// Close frame or end of stream.
    Closed,
}

impl SlackBot {
    /// Main loop: connect, handle envelopes, reconnect on failure.
    pub(crate) async fn run(self) {
        let base_delay = Duration::from_secs(self.reconnect_delay_secs);
        let max_delay = Duration::from_secs(self.reconnect_max_delay_secs);
        let mut delay = base_delay;

        loop {
            info!("Slack: opening Socket Mode connection");
            let outcome = self.connect_and_run().await;
            self.status.connected.store(false, Ordering::Relaxed);
            self.status.reconnects.fetch_add(1, Ordering::Relaxed);

            match outcome {
                Ok(DisconnectReason::Refresh) => {
                    info!("Slack: connection refresh requested, reconnecting immediately");
                    delay = base_delay;
                    continue;
                }
                Ok(DisconnectReason::Closed) => {
                    info!("Slack: connection closed, reconnecting...");
                    delay = base_delay;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        retry_in_secs = delay.as_secs(),
                        "Slack: connection error"
                    );
                }
            }

            tokio::time::sleep(delay).await;
            delay = next_delay(delay, max_delay);
        }
    }

    /// A single connection: open, read envelopes until disconnect.
    async fn connect_and_run(&self) -> anyhow::Result<DisconnectReason> {
        let url = self.web.open_connection().await?;
        let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
        let (mut sink, mut stream) = ws_stream.split();

        while let Some(msg) = stream.next().await {
            let text = match msg? {
                Message::Text(text) => text,
                Message::Close(_) => return Ok(DisconnectReason::Closed),
                _ => continue,
            };

            let envelope = match Envelope::parse(&text) {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(error = %e, "Slack: unparseable frame");
                    continue;
                }
            };

            // Ack before doing any work so Slack does not redeliver.
            if let Some(ack) = envelope.ack() {
                sink.send(Message::Text(ack.into())).await?;
            }

            match envelope.classify() {
                Incoming::Hello => {
                    self.status.connected.store(true, Ordering::Relaxed);
                    info!("Slack: connected");
                }
                Incoming::Disconnect(reason) => {
                    info!(reason = %reason, "Slack: disconnect requested");
                    return Ok(DisconnectReason::Refresh);
                }
                Incoming::Message(event) => {
                    let bot = self.clone();
                    tokio::spawn(async move { bot.handle_message(event).await });
                }
                Incoming::Ignored => debug!(kind = %envelope.kind, "Slack: envelope ignored"),
            }
        }

        Ok(DisconnectReason::Closed)
    }

    /// Answer a number message in its thread. Other messages are ignored.
    pub(crate) async fn handle_message(&self, event: MessageEvent) {
        let Some(reply) = self.reply_for(&event.text).await else {
            return;
        };

        if let Err(e) = self.web.post_reply(&event.channel, &event.ts, &reply).await {
            warn!(error = %e, channel = %event.channel, "Slack: failed to post reply");
            return;
        }

        info!(
            channel = %event.channel,
            thread_ts = %event.ts,
            backend = self.backend.name(),
            "Slack: replied to number message"
        );
    }

    /// The reply text for a message, or `None` if the bot stays quiet.
    pub(crate) async fn reply_for(&self, text: &str) -> Option<String> {
        if !is_number_message(text) {
            return None;
        }

        let text = text.trim();
        let reply = match parse_number(text) {
            Ok(number) => {
                let outcome = self.backend.sqrt(number).await;
                format_reply(number, &outcome)
            }
            Err(e) => format!("❌ Error: {}", e),
        };

        Some(reply)
    }
}

fn next_delay(current: Duration, max: Duration) -> Duration {
    (current * 2).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slack::{BotStatus, SqrtBackend, SlackWebClient};
    use std::sync::Arc;

    fn local_bot() -> SlackBot {
        SlackBot {
            web: SlackWebClient::new(reqwest::Client::new(), "xoxb-test", "xapp-test"),
            backend: SqrtBackend::Local,
            status: Arc::new(BotStatus::default()),
            reconnect_delay_secs: 1,
            reconnect_max_delay_secs: 60,
        }
    }

    #[tokio::test]
    async fn test_reply_for_numbers() {
        let bot = local_bot();
        assert_eq!(bot.reply_for("16").await.as_deref(), Some("√16.0 = 4.0"));
        assert_eq!(bot.reply_for(" 144 ").await.as_deref(), Some("√144.0 = 12.0"));
        assert_eq!(
            bot.reply_for("-4").await.as_deref(),
            Some("❌ Cannot compute square root of negative number: -4.0")
        );
    }

    #[tokio::test]
    async fn test_no_reply_for_chatter() {
        let bot = local_bot();
        assert!(bot.reply_for("hello there").await.is_none());
        assert!(bot.reply_for("what is sqrt of 16?").await.is_none());
        assert!(bot.reply_for("").await.is_none());
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let max = Duration::from_secs(60);
        assert_eq!(next_delay(Duration::from_secs(1), max), Duration::from_secs(2));
        assert_eq!(next_delay(Duration::from_secs(32), max), max);
        assert_eq!(next_delay(max, max), max);
    }
}
