//! Message dispatch HTTP handlers.

use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::Outcome;
use crate::dispatch::ContactInput;
use crate::gateway::MessageSender;
use crate::phone;
use crate::response;
use crate::server::AppState;

#[derive(Deserialize)]
pub struct SendMassRequest {
    #[serde(default)]
    contacts: Vec<ContactInput>,
    #[serde(default)]
    message: String,
    #[serde(default = "default_delay_millis")]
    delay: u64,
}

fn default_delay_millis() -> u64 {
    1000
}

#[derive(Deserialize)]
pub struct SendSingleRequest {
    #[serde(default)]
    phone: String,
    #[serde(default)]
    message: String,
}

/// POST /api/send-mass
pub async fn send_mass(
    State(state): State<AppState>,
    Json(req): Json<SendMassRequest>,
) -> Response {
    let summary = match state
        .dispatcher
        .dispatch(
            &req.contacts,
            &req.message,
            Duration::from_millis(req.delay),
            &state.shutdown,
        )
        .await
    {
        Ok(summary) => summary,
        Err(e) => return response::bad_request(e.to_string()).into_response(),
    };

    (StatusCode::OK, Json(summary)).into_response()
}

/// POST /api/send
pub async fn send_single(
    State(state): State<AppState>,
    Json(req): Json<SendSingleRequest>,
) -> Response {
    if req.phone.trim().is_empty() {
        return response::bad_request("phone must not be empty").into_response();
    }
    if req.message.trim().is_empty() {
        return response::bad_request("message must not be empty").into_response();
    }

    let normalized = phone::normalize(&req.phone);
    let outcome = match state.client.send_text(&normalized, &req.message).await {
        Ok(()) => Outcome::ok(serde_json::json!({
            "original": req.phone,
            "normalized": normalized,
        })),
        Err(e) => Outcome::fail(e),
    };

    (StatusCode::OK, Json(outcome)).into_response()
}
