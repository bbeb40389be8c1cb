//! Sequential mass-dispatch orchestration.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::gateway::MessageSender;
use crate::phone;

/// A contact as supplied by the operator: either a bare phone string or a
/// record with a `phone` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContactInput {
    Phone(String),
    Record {
        #[serde(default)]
        phone: Option<String>,
    },
}

impl ContactInput {
    fn phone(&self) -> Option<&str> {
        let phone = match self {
            ContactInput::Phone(p) => p.as_str(),
            ContactInput::Record { phone } => phone.as_deref()?,
        };
        if phone.trim().is_empty() { None } else { Some(phone) }
    }
}

/// Outcome of a single send attempt. Immutable once recorded; collected in
/// input order.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub original: String,
    pub normalized: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate outcome of a batch. `total == results.len() == success + errors`.
#[derive(Debug, Serialize)]
pub struct DispatchSummary {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
    pub results: Vec<DispatchResult>,
}

/// Request-level validation failures, reported before any network activity.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("contact list must not be empty")]
    EmptyContacts,
    #[error("message must not be empty")]
    EmptyMessage,
}

/// Sends one message to many contacts, strictly sequentially and in input
/// order, pacing consecutive sends with a uniform delay.
pub struct MassDispatcher {
    sender: Arc<dyn MessageSender>,
}

impl MassDispatcher {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self { sender }
    }

    /// Run a batch. An individual send failure is recorded and the batch
    /// continues; the only early exit is `cancel`, honored at the inter-send
    /// delay boundary, which yields the results recorded so far.
    pub async fn dispatch(
        &self,
        contacts: &[ContactInput],
        message: &str,
        delay: Duration,
        cancel: &CancellationToken,
    ) -> Result<DispatchSummary, DispatchError> {
        if contacts.is_empty() {
            return Err(DispatchError::EmptyContacts);
        }
        if message.trim().is_empty() {
            return Err(DispatchError::EmptyMessage);
        }

        // Normalize up front; contacts without a phone are dropped here and
        // never appear in the results.
        let normalized: Vec<(String, String)> = contacts
            .iter()
            .filter_map(|c| c.phone())
            .map(|p| (p.to_string(), phone::normalize(p)))
            .collect();

        info!(
            contacts = normalized.len(),
            delay_ms = delay.as_millis() as u64,
            "starting mass dispatch"
        );

        let mut results = Vec::with_capacity(normalized.len());
        let mut success = 0usize;
        let mut errors = 0usize;

        for (i, (original, normalized_phone)) in normalized.iter().enumerate() {
            match self.sender.send_text(normalized_phone, message).await {
                Ok(()) => {
                    success += 1;
                    results.push(DispatchResult {
                        original: original.clone(),
                        normalized: normalized_phone.clone(),
                        success: true,
                        error: None,
                    });
                }
                Err(e) => {
                    errors += 1;
                    warn!(phone = %normalized_phone, error = %e, "send failed");
                    results.push(DispatchResult {
                        original: original.clone(),
                        normalized: normalized_phone.clone(),
                        success: false,
                        error: Some(e.to_string()),
                    });
                }
            }

            // Pace between sends only; nothing before the first or after the
            // last. Cancellation is honored here and nowhere else.
            if i < normalized.len() - 1 {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        warn!(sent = results.len(), "dispatch cancelled at delay boundary");
                        break;
                    }
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        Ok(DispatchSummary {
            total: results.len(),
            success,
            errors,
            results,
        })
    }
}
