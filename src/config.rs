use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub operator: OperatorConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }

    /// Apply environment overrides on top of the file-loaded values. Secrets
    /// are usually deployed via environment, not the config file.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("PORT")
            && let Ok(port) = v.parse()
        {
            self.server.port = port;
        }
        if let Ok(v) = std::env::var("WAHA_BASE_URL") {
            self.gateway.base_url = v;
        }
        if let Ok(v) = std::env::var("WAHA_SESSION_NAME") {
            self.gateway.session = v;
        }
        if let Ok(v) = std::env::var("WAHA_API_KEY") {
            self.gateway.api_key = Some(v);
        }
        if let Ok(v) = std::env::var("WAHA_USERNAME") {
            self.gateway.username = v;
        }
        if let Ok(v) = std::env::var("WAHA_PASSWORD") {
            self.gateway.password = v;
        }
        if let Ok(v) = std::env::var("SYSTEM_PASSWORD") {
            self.operator.password = v;
        }
    }
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

// Generous on purpose: a long paced batch runs inside a single request.
fn default_request_timeout() -> u64 {
    300
}

// ============================================================================
// GatewayConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_base_url")]
    pub base_url: String,
    #[serde(default = "default_gateway_session")]
    pub session: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_gateway_username")]
    pub username: String,
    #[serde(default = "default_gateway_password")]
    pub password: String,
    #[serde(default = "default_status_timeout")]
    pub status_timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_base_url(),
            session: default_gateway_session(),
            api_key: None,
            username: default_gateway_username(),
            password: default_gateway_password(),
            status_timeout_seconds: default_status_timeout(),
        }
    }
}

fn default_gateway_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_gateway_session() -> String {
    "default".to_string()
}

fn default_gateway_username() -> String {
    "admin".to_string()
}

fn default_gateway_password() -> String {
    "admin123".to_string()
}

fn default_status_timeout() -> u64 {
    5
}

// ============================================================================
// OperatorConfig
// ============================================================================

/// Shared credential protecting this service's own API surface.
#[derive(Debug, Deserialize)]
pub struct OperatorConfig {
    #[serde(default = "default_operator_username")]
    pub username: String,
    #[serde(default = "default_operator_password")]
    pub password: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            username: default_operator_username(),
            password: default_operator_password(),
        }
    }
}

fn default_operator_username() -> String {
    "admin".to_string()
}

fn default_operator_password() -> String {
    "admin123".to_string()
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_seconds, 300);
        assert_eq!(config.gateway.base_url, "http://localhost:3000");
        assert_eq!(config.gateway.session, "default");
        assert!(config.gateway.api_key.is_none());
        assert_eq!(config.gateway.status_timeout_seconds, 5);
        assert_eq!(config.operator.username, "admin");
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_defaults() {
        let tmp_dir = TempDir::new().unwrap();
        let missing_path = tmp_dir.path().join("missing-config.yaml");
        let config = Config::load(missing_path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.gateway.session, "default");
    }

    #[tokio::test]
    async fn test_load_valid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
server:
  host: "127.0.0.1"
  port: 3001
gateway:
  base_url: "http://waha:3000"
  session: "sales"
  api_key: "secret"
operator:
  password: "hunter2"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.gateway.base_url, "http://waha:3000");
        assert_eq!(config.gateway.session, "sales");
        assert_eq!(config.gateway.api_key.as_deref(), Some("secret"));
        assert_eq!(config.operator.password, "hunter2");
    }

    #[tokio::test]
    async fn test_load_partial_yaml_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
gateway:
  base_url: "http://waha:3000"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(config.server.host, "0.0.0.0"); // default
        assert_eq!(config.gateway.base_url, "http://waha:3000");
        assert_eq!(config.gateway.session, "default"); // default
        assert_eq!(config.gateway.username, "admin"); // default
    }

    #[tokio::test]
    async fn test_env_overrides_win_over_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
gateway:
  base_url: "http://file-waha:3000"
operator:
  password: "file-secret"
"#
        )
        .unwrap();

        let mut config = Config::load(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(config.gateway.base_url, "http://file-waha:3000");
        assert!(config.gateway.api_key.is_none());

        unsafe {
            std::env::set_var("WAHA_BASE_URL", "http://env-waha:3000");
            std::env::set_var("WAHA_API_KEY", "env-key");
            std::env::set_var("SYSTEM_PASSWORD", "env-secret");
        }
        config.apply_env();
        unsafe {
            std::env::remove_var("WAHA_BASE_URL");
            std::env::remove_var("WAHA_API_KEY");
            std::env::remove_var("SYSTEM_PASSWORD");
        }

        assert_eq!(config.gateway.base_url, "http://env-waha:3000");
        assert_eq!(config.gateway.api_key.as_deref(), Some("env-key"));
        assert_eq!(config.operator.password, "env-secret");

        // An API key arriving via environment flips gateway auth resolution.
        let auth = crate::gateway::GatewayAuth::resolve(
            config.gateway.api_key.as_deref(),
            &config.gateway.username,
            &config.gateway.password,
        );
        assert_eq!(auth, crate::gateway::GatewayAuth::ApiKey("env-key".to_string()));
    }

    #[tokio::test]
    async fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(file.path().to_str().unwrap()).await;
        assert!(result.is_err());
    }
}
