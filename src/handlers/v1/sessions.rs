//! Gateway session lifecycle HTTP handlers.
//!
//! These are pass-throughs: the session itself lives in the gateway, and
//! failures come back in-band as `{success: false, error}` rather than as
//! HTTP error statuses.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::Outcome;
use crate::gateway::WebhookRegistration;
use crate::server::AppState;

/// GET /api/status — every session known to the gateway.
///
/// The session list sits at the top level of the envelope, next to `success`;
/// operator consoles read `body.sessions` directly.
pub async fn list_sessions(State(state): State<AppState>) -> Response {
    let body = sessions_body(state.client.list_sessions().await);
    (StatusCode::OK, Json(body)).into_response()
}

fn sessions_body(
    result: Result<serde_json::Value, crate::gateway::GatewayError>,
) -> serde_json::Value {
    match result {
        Ok(sessions) => serde_json::json!({ "success": true, "sessions": sessions }),
        Err(e) => serde_json::json!({ "success": false, "error": e.to_string() }),
    }
}

/// GET /api/session-status — the configured session's status document.
pub async fn session_status(State(state): State<AppState>) -> Response {
    let outcome = match state.client.status().await {
        Ok(info) => Outcome::ok(serde_json::json!({
            "name": info.name,
            "status": info.status,
        })),
        Err(e) => Outcome::fail(e),
    };
    (StatusCode::OK, Json(outcome)).into_response()
}

/// GET /api/qr-code — guarded QR retrieval.
///
/// The guard queries status fresh on every call; when the session is not in a
/// QR-eligible state the gateway's QR endpoint is never touched.
pub async fn qr_code(State(state): State<AppState>) -> Response {
    if let Err(e) = state.guard.check_qr_eligible().await {
        return (StatusCode::OK, Json(Outcome::fail(e))).into_response();
    }

    let outcome = match state.client.qr_code().await {
        Ok(data) => Outcome::ok(data),
        Err(e) => Outcome::fail(e),
    };
    (StatusCode::OK, Json(outcome)).into_response()
}

/// POST /api/start-session
pub async fn start_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let webhook = WebhookRegistration::for_url(callback_url(&headers));
    let outcome = match state.client.start_session(webhook).await {
        Ok(data) => Outcome::ok(data),
        Err(e) => Outcome::fail(e),
    };
    (StatusCode::OK, Json(outcome)).into_response()
}

/// POST /api/stop-session
pub async fn stop_session(State(state): State<AppState>) -> Response {
    let outcome = match state.client.stop_session().await {
        Ok(data) => Outcome::ok(data),
        Err(e) => Outcome::fail(e),
    };
    (StatusCode::OK, Json(outcome)).into_response()
}

/// POST /api/restart-session
pub async fn restart_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let webhook = WebhookRegistration::for_url(callback_url(&headers));
    let outcome = match state.client.restart_session(webhook).await {
        Ok(data) => Outcome::ok(data),
        Err(e) => Outcome::fail(e),
    };
    (StatusCode::OK, Json(outcome)).into_response()
}

/// POST /api/setup-webhook — (re)register this service's callback with the
/// gateway without restarting the session.
pub async fn setup_webhook(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let url = callback_url(&headers);
    let outcome = match state
        .client
        .register_webhook(WebhookRegistration::messages_only(url.clone()))
        .await
    {
        Ok(data) => Outcome::ok(serde_json::json!({
            "webhookUrl": url,
            "data": data,
        })),
        Err(e) => Outcome::fail(e),
    };
    (StatusCode::OK, Json(outcome)).into_response()
}

/// Callback URL the gateway should deliver events to, derived from the
/// operator's request. Behind a TLS terminator the proxy's
/// `X-Forwarded-Proto` decides the scheme.
fn callback_url(headers: &HeaderMap) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost:8080");
    format!("{scheme}://{host}/webhook/waha")
}
