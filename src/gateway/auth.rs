//! Credential scheme resolution for the gateway.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Authentication scheme presented to the gateway.
///
/// Resolved once from configuration: a configured API key always wins,
/// otherwise basic auth with the configured (or default) credential pair.
/// Resolution is pure; no speculative unauthenticated probe is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayAuth {
    ApiKey(String),
    Basic { username: String, password: String },
}

impl GatewayAuth {
    pub fn resolve(
        api_key: Option<&str>,
        username: &str,
        password: &str,
    ) -> Self {
        match api_key {
            Some(key) if !key.is_empty() => GatewayAuth::ApiKey(key.to_string()),
            _ => GatewayAuth::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
        }
    }

    /// Header name/value pair carrying the credential.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            GatewayAuth::ApiKey(key) => ("X-Api-Key", key.clone()),
            GatewayAuth::Basic { username, password } => {
                let encoded = BASE64.encode(format!("{username}:{password}"));
                ("Authorization", format!("Basic {encoded}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_takes_precedence() {
        let auth = GatewayAuth::resolve(Some("secret"), "admin", "admin123");
        assert_eq!(auth, GatewayAuth::ApiKey("secret".to_string()));
        assert_eq!(auth.header(), ("X-Api-Key", "secret".to_string()));
    }

    #[test]
    fn empty_api_key_falls_back_to_basic() {
        let auth = GatewayAuth::resolve(Some(""), "admin", "admin123");
        assert!(matches!(auth, GatewayAuth::Basic { .. }));
    }

    #[test]
    fn basic_header_encodes_credentials() {
        let auth = GatewayAuth::resolve(None, "admin", "admin123");
        let (name, value) = auth.header();
        assert_eq!(name, "Authorization");
        // base64("admin:admin123")
        assert_eq!(value, "Basic YWRtaW46YWRtaW4xMjM=");
    }
}
