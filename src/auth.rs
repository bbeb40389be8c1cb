//! Operator-surface authentication.
//!
//! Every `/api` and `/webhook` route sits behind one shared Basic-auth
//! credential. Core modules never see this check; by the time a handler runs
//! it has already passed.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::response::ErrorResponse;
use crate::server::AppState;

const CHALLENGE: &str = "Basic realm=\"DISPIDI\"";

pub async fn require_operator(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(encoded) = header_value.and_then(|v| v.strip_prefix("Basic ")) else {
        return challenge("authentication required");
    };

    let operator = &state.config.operator;
    if !credentials_match(encoded, &operator.username, &operator.password) {
        return challenge("invalid credentials");
    }

    next.run(request).await
}

fn credentials_match(encoded: &str, username: &str, password: &str) -> bool {
    let Ok(decoded) = BASE64.decode(encoded) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((given_user, given_pass)) = decoded.split_once(':') else {
        return false;
    };
    // Username is not secret; the password compare is constant-time.
    given_user == username && safe_equal(given_pass, password)
}

/// Constant-time string comparison (prevents timing attacks).
fn safe_equal(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let diff = a
        .as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y));
    diff == 0
}

fn challenge(message: &str) -> Response {
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        header::HeaderValue::from_static(CHALLENGE),
    );
    response
}
