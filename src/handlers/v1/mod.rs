//! Operator API handlers.

mod dispatch;
mod sessions;
mod webhook;

pub use dispatch::{send_mass, send_single};
pub use sessions::{
    list_sessions, qr_code, restart_session, session_status, setup_webhook, start_session,
    stop_session,
};
pub use webhook::waha_event;

use serde::Serialize;

/// Pass-through outcome for gateway operations. Gateway failures are reported
/// in-band with HTTP 200; only operator-side validation maps to 4xx.
#[derive(Debug, Serialize)]
pub(crate) struct Outcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub(crate) fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub(crate) fn fail(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}
