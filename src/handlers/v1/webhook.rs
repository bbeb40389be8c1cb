//! Inbound gateway webhook handler.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::info;

use crate::webhook::{self, WebhookEnvelope};

/// POST /webhook/waha
///
/// Always acknowledges with 2xx; a body the JSON extractor cannot parse is
/// rejected before this handler runs, and that is the only failure path.
pub async fn waha_event(Json(envelope): Json<WebhookEnvelope>) -> Response {
    info!(event = %envelope.event, session = %envelope.session, "gateway webhook received");
    let ack = webhook::handle(&envelope);
    (StatusCode::OK, Json(ack)).into_response()
}
