//! Gateway error types.

use std::fmt;

/// Errors that can occur when calling the WhatsApp gateway.
#[derive(Debug)]
pub enum GatewayError {
    /// HTTP request failed (connect, DNS, timeout).
    Request(reqwest::Error),
    /// Gateway returned an error response.
    Api { status: u16, message: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Request(e) => write!(f, "gateway request failed: {e}"),
            GatewayError::Api { status, message } => {
                write!(f, "gateway error (status {status}): {message}")
            }
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::Request(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Request(err)
    }
}
