//! Client for the external WAHA-compatible WhatsApp gateway.

mod auth;
mod client;
mod error;
mod session;
mod types;

pub use auth::GatewayAuth;
pub use client::{MessageSender, SessionStatusSource, WahaClient};
pub use error::GatewayError;
pub use session::{QrGateError, SessionGuard, is_qr_eligible};
pub use types::{SessionInfo, WebhookRegistration};
