//! Wire types for the WAHA-compatible gateway API.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/sendText`.
#[derive(Debug, Serialize)]
pub struct SendTextRequest {
    pub session: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub text: String,
}

/// Session document returned by `GET /api/sessions/{session}`.
///
/// The gateway owns the status vocabulary; everything beyond the fields this
/// service inspects is carried opaquely in `raw`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub name: Option<String>,
    pub status: String,
    #[serde(flatten)]
    pub raw: serde_json::Map<String, serde_json::Value>,
}

/// One webhook registration entry.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookRegistration {
    pub url: String,
    pub events: Vec<String>,
}

impl WebhookRegistration {
    /// Registration delivering message and session-status events to `url`.
    /// Used when starting a session.
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events: vec!["message".to_string(), "session.status".to_string()],
        }
    }

    /// Registration delivering message events only. Used by the standalone
    /// webhook re-registration, which updates the callback of an already
    /// running session.
    pub fn messages_only(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            events: vec!["message".to_string()],
        }
    }
}

/// Body for session lifecycle calls that carry webhook configuration.
#[derive(Debug, Serialize)]
pub struct SessionUpsertRequest {
    pub name: String,
    pub config: SessionConfig,
}

#[derive(Debug, Serialize)]
pub struct SessionConfig {
    pub webhooks: Vec<WebhookRegistration>,
}

/// Error body shape used by WAHA deployments; both field names occur in the
/// wild, so the first one present wins.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Extract the gateway's own error text from a response body, falling
    /// back to the raw body when it is not the known error shape.
    pub fn extract(body: &str) -> String {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .unwrap_or_else(|| body.to_string())
    }
}
