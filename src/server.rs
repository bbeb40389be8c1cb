use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::auth;
use crate::config::Config;
use crate::dispatch::MassDispatcher;
use crate::gateway::{SessionGuard, WahaClient};
use crate::handlers;

/// Shared application state: immutable configuration plus the gateway client
/// and the core services built on top of it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: WahaClient,
    pub guard: SessionGuard,
    pub dispatcher: Arc<MassDispatcher>,
    /// Cancelled on shutdown; in-flight batches stop at their next delay
    /// boundary and return partial summaries.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, shutdown: CancellationToken) -> Self {
        let client = WahaClient::new(&config.gateway);
        let guard = SessionGuard::new(Arc::new(client.clone()));
        let dispatcher = Arc::new(MassDispatcher::new(Arc::new(client.clone())));
        Self {
            config: Arc::new(config),
            client,
            guard,
            dispatcher,
            shutdown,
        }
    }
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    // Everything except the liveness probe requires the operator credential.
    let protected = Router::new()
        .route("/api/send-mass", post(handlers::v1::send_mass))
        .route("/api/send", post(handlers::v1::send_single))
        .route("/api/status", get(handlers::v1::list_sessions))
        .route("/api/session-status", get(handlers::v1::session_status))
        .route("/api/qr-code", get(handlers::v1::qr_code))
        .route("/api/start-session", post(handlers::v1::start_session))
        .route("/api/stop-session", post(handlers::v1::stop_session))
        .route("/api/restart-session", post(handlers::v1::restart_session))
        .route("/api/setup-webhook", post(handlers::v1::setup_webhook))
        .route("/webhook/waha", post(handlers::v1::waha_event))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_operator,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/livez", get(handlers::livez))
        .merge(protected)
        .layer(cors)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
        .with_state(state)
}
