//! Socket Mode envelope types.
//!
//! Every frame Slack sends over the socket is a JSON envelope. Frames with an
//! `envelope_id` must be acknowledged promptly or Slack redelivers them.

use serde::Deserialize;
use serde_json::{json, Value};

/// A raw Socket Mode envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub envelope_id: Option<String>,
    #[serde(default)]
    pub payload: Option<Value>,
    /// Present on `disconnect` envelopes, e.g. `refresh_requested`.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A channel message the bot may answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageEvent {
    pub channel: String,
    pub ts: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
}

/// What the connection loop should do with an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    /// Connection established.
    Hello,
    /// Slack is about to close this connection.
    Disconnect(String),
    /// A user message to consider answering.
    Message(MessageEvent),
    /// Anything else.
    Ignored,
}

impl Envelope {
    /// Parse a text frame.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// The acknowledgement frame for this envelope, if it needs one.
    pub fn ack(&self) -> Option<String> {
        self.envelope_id
            .as_ref()
            .map(|id| json!({ "envelope_id": id }).to_string())
    }

    /// Decide how to handle this envelope.
    pub fn classify(&self) -> Incoming {
        match self.kind.as_str() {
            "hello" => Incoming::Hello,
            "disconnect" => {
                Incoming::Disconnect(self.reason.clone().unwrap_or_else(|| "unknown".into()))
            }
            "events_api" => self.message_event().map_or(Incoming::Ignored, Incoming::Message),
            _ => Incoming::Ignored,
        }
    }

    /// Extract a plain user message from an `events_api` payload.
    ///
    /// Edits, deletions, joins and bot posts carry a `subtype` or `bot_id`
    /// and are skipped, which also keeps the bot from answering itself.
    fn message_event(&self) -> Option<MessageEvent> {
        let event = self.payload.as_ref()?.get("event")?;
        if event.get("type").and_then(Value::as_str) != Some("message") {
            return None;
        }

        let message: MessageEvent = serde_json::from_value(event.clone()).ok()?;
        if message.subtype.is_some() || message.bot_id.is_some() {
            return None;
        }

        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events_api(event: Value) -> String {
        json!({
            "envelope_id": "57d6a792-4d35-4d0b-b6aa-3361493e1caf",
            "type": "events_api",
            "accepts_response_payload": false,
            "retry_attempt": 0,
            "payload": {
                "type": "event_callback",
                "team_id": "T123",
                "event": event,
            },
        })
        .to_string()
    }

    #[test]
    fn test_hello() {
        let envelope =
            Envelope::parse(r#"{"type":"hello","num_connections":1,"debug_info":{}}"#).unwrap();
        assert_eq!(envelope.classify(), Incoming::Hello);
        assert!(envelope.ack().is_none());
    }

    #[test]
    fn test_disconnect() {
        let envelope =
            Envelope::parse(r#"{"type":"disconnect","reason":"refresh_requested"}"#).unwrap();
        assert_eq!(
            envelope.classify(),
            Incoming::Disconnect("refresh_requested".to_string())
        );
    }

    #[test]
    fn test_user_message() {
        let text = events_api(json!({
            "type": "message",
            "channel": "C1",
            "user": "U1",
            "text": "16",
            "ts": "1700000000.000100",
        }));
        let envelope = Envelope::parse(&text).unwrap();

        let ack: Value = serde_json::from_str(&envelope.ack().unwrap()).unwrap();
        assert_eq!(ack["envelope_id"], "57d6a792-4d35-4d0b-b6aa-3361493e1caf");

        match envelope.classify() {
            Incoming::Message(message) => {
                assert_eq!(message.channel, "C1");
                assert_eq!(message.text, "16");
                assert_eq!(message.ts, "1700000000.000100");
            }
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[test]
    fn test_bot_and_subtype_messages_are_ignored() {
        let bot = events_api(json!({
            "type": "message",
            "channel": "C1",
            "bot_id": "B1",
            "text": "√16.0 = 4.0",
            "ts": "1.2",
        }));
        assert_eq!(Envelope::parse(&bot).unwrap().classify(), Incoming::Ignored);

        let edited = events_api(json!({
            "type": "message",
            "subtype": "message_changed",
            "channel": "C1",
            "ts": "1.3",
        }));
        let envelope = Envelope::parse(&edited).unwrap();
        assert_eq!(envelope.classify(), Incoming::Ignored);
        // Still acknowledged so Slack does not redeliver it.
        assert!(envelope.ack().is_some());
    }

    #[test]
    fn test_other_events_are_ignored() {
        let reaction = events_api(json!({
            "type": "reaction_added",
            "user": "U1",
            "reaction": "thumbsup",
        }));
        assert_eq!(
            Envelope::parse(&reaction).unwrap().classify(),
            Incoming::Ignored
        );

        let slash = r#"{"type":"slash_commands","envelope_id":"x","payload":{}}"#;
        assert_eq!(Envelope::parse(slash).unwrap().classify(), Incoming::Ignored);
    }
}
