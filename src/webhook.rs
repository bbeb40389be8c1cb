//! Inbound gateway event classification.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Envelope delivered by the gateway's webhook callback.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    pub event: String,
    #[serde(default)]
    pub session: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// The closed set of events this service understands, plus a default bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    SessionStatus,
    MessageCreated,
    MessageUpdated,
    MessageDeleted,
    Unhandled,
}

impl EventKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "session.status" => EventKind::SessionStatus,
            "message.created" => EventKind::MessageCreated,
            "message.updated" => EventKind::MessageUpdated,
            "message.deleted" => EventKind::MessageDeleted,
            _ => EventKind::Unhandled,
        }
    }
}

/// Acknowledgment returned to the gateway. Always successful; a webhook
/// delivery must never bounce except on an unparsable body, which the JSON
/// extractor rejects before this module runs.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: &'static str,
}

/// Fields this service reads out of message payloads for logging. Everything
/// else in the payload is ignored.
#[derive(Debug, Default, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusPayload {
    #[serde(default)]
    status: Option<String>,
}

/// Classify the event and record it. Handlers are observational only; this is
/// the extension point for consumers that want to react to gateway traffic.
pub fn handle(envelope: &WebhookEnvelope) -> Ack {
    let session = envelope.session.as_str();
    match EventKind::from_tag(&envelope.event) {
        EventKind::SessionStatus => {
            let payload: StatusPayload =
                serde_json::from_value(envelope.payload.clone()).unwrap_or_default();
            info!(
                session,
                status = payload.status.as_deref().unwrap_or("unknown"),
                "session status changed"
            );
        }
        EventKind::MessageCreated => {
            let payload: MessagePayload =
                serde_json::from_value(envelope.payload.clone()).unwrap_or_default();
            info!(
                session,
                from = payload.from.as_deref().unwrap_or("unknown"),
                preview = preview(payload.body.as_deref()),
                "message received"
            );
        }
        EventKind::MessageUpdated => {
            let payload: MessagePayload =
                serde_json::from_value(envelope.payload.clone()).unwrap_or_default();
            info!(
                session,
                id = payload.id.as_deref().unwrap_or("unknown"),
                status = payload.status.as_deref().unwrap_or("unknown"),
                "message updated"
            );
        }
        EventKind::MessageDeleted => {
            let payload: MessagePayload =
                serde_json::from_value(envelope.payload.clone()).unwrap_or_default();
            info!(
                session,
                id = payload.id.as_deref().unwrap_or("unknown"),
                "message deleted"
            );
        }
        EventKind::Unhandled => {
            info!(session, event = %envelope.event, "unhandled gateway event");
        }
    }

    Ack {
        success: true,
        message: "webhook processed",
    }
}

fn preview(body: Option<&str>) -> String {
    let body = body.unwrap_or_default();
    let mut preview: String = body.chars().take(50).collect();
    if body.chars().count() > 50 {
        preview.push('…');
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(event: &str, payload: serde_json::Value) -> WebhookEnvelope {
        WebhookEnvelope {
            event: event.to_string(),
            session: "default".to_string(),
            payload,
        }
    }

    #[test]
    fn known_events_classify_into_closed_set() {
        assert_eq!(EventKind::from_tag("session.status"), EventKind::SessionStatus);
        assert_eq!(EventKind::from_tag("message.created"), EventKind::MessageCreated);
        assert_eq!(EventKind::from_tag("message.updated"), EventKind::MessageUpdated);
        assert_eq!(EventKind::from_tag("message.deleted"), EventKind::MessageDeleted);
        assert_eq!(EventKind::from_tag("message.any"), EventKind::Unhandled);
        assert_eq!(EventKind::from_tag(""), EventKind::Unhandled);
    }

    #[test]
    fn unrecognized_event_still_acknowledges() {
        let ack = handle(&envelope("engine.event", json!({})));
        assert!(ack.success);
    }

    #[test]
    fn malformed_payload_shape_still_acknowledges() {
        // A string payload where an object is expected must not fail the call.
        let ack = handle(&envelope("message.created", json!("not an object")));
        assert!(ack.success);
    }

    #[test]
    fn envelope_tolerates_missing_optional_fields() {
        let envelope: WebhookEnvelope =
            serde_json::from_str(r#"{"event":"session.status"}"#).unwrap();
        assert_eq!(envelope.session, "");
        assert!(handle(&envelope).success);
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let long = "x".repeat(120);
        let p = preview(Some(&long));
        assert_eq!(p.chars().count(), 51);
        assert!(p.ends_with('…'));
        assert_eq!(preview(Some("short")), "short");
    }
}
