//! HTTP client for the WAHA-compatible gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use tracing::debug;

use super::auth::GatewayAuth;
use super::error::GatewayError;
use super::types::{
    ErrorBody, SendTextRequest, SessionConfig, SessionInfo, SessionUpsertRequest,
    WebhookRegistration,
};
use crate::config::GatewayConfig;

/// Sends one text message through the gateway.
///
/// The dispatcher depends on this seam rather than on [`WahaClient`] so that
/// batch behavior is testable without a live gateway.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, phone: &str, text: &str) -> Result<(), GatewayError>;
}

/// Reports the current gateway session status.
#[async_trait]
pub trait SessionStatusSource: Send + Sync {
    async fn session_status(&self) -> Result<SessionInfo, GatewayError>;
}

/// Thin request wrapper around the gateway HTTP API.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its connection
/// pool across clones.
#[derive(Clone)]
pub struct WahaClient {
    client: Client,
    base_url: String,
    session: String,
    auth: GatewayAuth,
    status_timeout: Duration,
}

impl WahaClient {
    /// Delay between stop and start when restarting a session, giving the
    /// gateway time to tear the old session down.
    const RESTART_GRACE: Duration = Duration::from_secs(2);

    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session: config.session.clone(),
            auth: GatewayAuth::resolve(
                config.api_key.as_deref(),
                &config.username,
                &config.password,
            ),
            status_timeout: Duration::from_secs(config.status_timeout_seconds),
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session
    }

    /// GET `/api/sessions/{session}`. Short timeout so status polling never
    /// blocks callers indefinitely.
    pub async fn status(&self) -> Result<SessionInfo, GatewayError> {
        let path = format!("/api/sessions/{}", self.session);
        let response = self
            .request(Method::GET, &path)
            .timeout(self.status_timeout)
            .send()
            .await?;
        let value = Self::into_json(response).await?;
        serde_json::from_value(value).map_err(|e| GatewayError::Api {
            status: 200,
            message: format!("unexpected session document: {e}"),
        })
    }

    /// GET `/api/sessions` — all sessions known to the gateway.
    pub async fn list_sessions(&self) -> Result<serde_json::Value, GatewayError> {
        let response = self
            .request(Method::GET, "/api/sessions")
            .timeout(self.status_timeout)
            .send()
            .await?;
        Self::into_json(response).await
    }

    /// GET `/api/sessions/{session}/auth/qr`.
    ///
    /// Callers must gate this on session status; see
    /// [`SessionGuard`](super::session::SessionGuard).
    pub async fn qr_code(&self) -> Result<serde_json::Value, GatewayError> {
        let path = format!("/api/sessions/{}/auth/qr", self.session);
        let response = self.request(Method::GET, &path).send().await?;
        Self::into_json(response).await
    }

    /// POST `/api/sessions/{session}/start`, registering `webhook` with the
    /// gateway so events flow back to this service.
    pub async fn start_session(
        &self,
        webhook: WebhookRegistration,
    ) -> Result<serde_json::Value, GatewayError> {
        let path = format!("/api/sessions/{}/start", self.session);
        let body = SessionUpsertRequest {
            name: self.session.clone(),
            config: SessionConfig {
                webhooks: vec![webhook],
            },
        };
        let response = self.request(Method::POST, &path).json(&body).send().await?;
        Self::into_json(response).await
    }

    /// POST `/api/sessions/{session}/stop`.
    pub async fn stop_session(&self) -> Result<serde_json::Value, GatewayError> {
        let path = format!("/api/sessions/{}/stop", self.session);
        let response = self
            .request(Method::POST, &path)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        Self::into_json(response).await
    }

    /// Stop, wait for the gateway to settle, start again.
    pub async fn restart_session(
        &self,
        webhook: WebhookRegistration,
    ) -> Result<serde_json::Value, GatewayError> {
        self.stop_session().await?;
        tokio::time::sleep(Self::RESTART_GRACE).await;
        self.start_session(webhook).await
    }

    /// PUT `/api/sessions/{session}` — update webhook registration in place.
    pub async fn register_webhook(
        &self,
        webhook: WebhookRegistration,
    ) -> Result<serde_json::Value, GatewayError> {
        let path = format!("/api/sessions/{}", self.session);
        let body = SessionUpsertRequest {
            name: self.session.clone(),
            config: SessionConfig {
                webhooks: vec![webhook],
            },
        };
        let response = self.request(Method::PUT, &path).json(&body).send().await?;
        Self::into_json(response).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "gateway request");
        let (header, value) = self.auth.header();
        self.client
            .request(method, url)
            .header("Content-Type", "application/json")
            .header(header, value)
    }

    /// Normalize a gateway response: non-2xx becomes a typed error carrying
    /// the gateway's own error text when the body provides one.
    async fn into_json(response: reqwest::Response) -> Result<serde_json::Value, GatewayError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status,
                message: ErrorBody::extract(&body),
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl MessageSender for WahaClient {
    /// POST `/api/sendText`. No per-request timeout: delivery through the
    /// gateway can legitimately take a while.
    async fn send_text(&self, phone: &str, text: &str) -> Result<(), GatewayError> {
        let body = SendTextRequest {
            session: self.session.clone(),
            chat_id: format!("{phone}@c.us"),
            text: text.to_string(),
        };
        let response = self
            .request(Method::POST, "/api/sendText")
            .json(&body)
            .send()
            .await?;
        Self::into_json(response).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStatusSource for WahaClient {
    async fn session_status(&self) -> Result<SessionInfo, GatewayError> {
        self.status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn test_config(base_url: &str) -> GatewayConfig {
        GatewayConfig {
            base_url: base_url.to_string(),
            session: "default".to_string(),
            api_key: None,
            username: "admin".to_string(),
            password: "admin123".to_string(),
            status_timeout_seconds: 5,
        }
    }

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let client = WahaClient::new(&test_config("http://gateway:3000/"));
        assert_eq!(client.base_url, "http://gateway:3000");
    }

    #[test]
    fn resolves_basic_auth_when_no_api_key() {
        let client = WahaClient::new(&test_config("http://gateway:3000"));
        assert!(matches!(client.auth, GatewayAuth::Basic { .. }));
    }

    #[test]
    fn resolves_api_key_when_configured() {
        let mut config = test_config("http://gateway:3000");
        config.api_key = Some("k".to_string());
        let client = WahaClient::new(&config);
        assert_eq!(client.auth, GatewayAuth::ApiKey("k".to_string()));
    }
}
