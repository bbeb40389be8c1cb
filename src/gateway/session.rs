//! Session-state guard for privileged gateway operations.

use std::fmt;
use std::sync::Arc;

use super::client::SessionStatusSource;
use super::error::GatewayError;

/// Statuses in which the gateway can produce a QR code: the session is either
/// still initializing or explicitly waiting for authentication.
pub const QR_ELIGIBLE_STATUSES: &[&str] = &["SCAN_QR_CODE", "OPENING", "STARTING"];

/// Whether a session status permits a QR fetch. Any status outside the fixed
/// allow-list, including ones this service has never seen, is ineligible.
pub fn is_qr_eligible(status: &str) -> bool {
    QR_ELIGIBLE_STATUSES.contains(&status)
}

/// Why the QR gate refused.
#[derive(Debug)]
pub enum QrGateError {
    /// Session is in a state where the gateway has no QR to offer.
    NotEligible { status: String },
    /// The fresh status query itself failed.
    Status(GatewayError),
}

impl fmt::Display for QrGateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QrGateError::NotEligible { status } => write!(
                f,
                "session is not ready for QR code (current status: {status}); try starting the session first"
            ),
            QrGateError::Status(e) => write!(f, "failed to check session status: {e}"),
        }
    }
}

impl std::error::Error for QrGateError {}

/// Read-only precondition gate in front of QR retrieval.
///
/// Session state is owned entirely by the gateway; every check issues a fresh
/// status query, nothing is memoized.
#[derive(Clone)]
pub struct SessionGuard {
    status_source: Arc<dyn SessionStatusSource>,
}

impl SessionGuard {
    pub fn new(status_source: Arc<dyn SessionStatusSource>) -> Self {
        Self { status_source }
    }

    /// Query the current status and decide whether a QR fetch may proceed.
    pub async fn check_qr_eligible(&self) -> Result<(), QrGateError> {
        let info = self
            .status_source
            .session_status()
            .await
            .map_err(QrGateError::Status)?;
        if is_qr_eligible(&info.status) {
            Ok(())
        } else {
            Err(QrGateError::NotEligible {
                status: info.status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::types::SessionInfo;
    use async_trait::async_trait;

    struct FixedStatus(&'static str);

    #[async_trait]
    impl SessionStatusSource for FixedStatus {
        async fn session_status(&self) -> Result<SessionInfo, GatewayError> {
            Ok(SessionInfo {
                name: Some("default".to_string()),
                status: self.0.to_string(),
                raw: Default::default(),
            })
        }
    }

    struct FailingStatus;

    #[async_trait]
    impl SessionStatusSource for FailingStatus {
        async fn session_status(&self) -> Result<SessionInfo, GatewayError> {
            Err(GatewayError::Api {
                status: 502,
                message: "gateway down".to_string(),
            })
        }
    }

    #[test]
    fn only_allow_listed_statuses_are_eligible() {
        assert!(is_qr_eligible("SCAN_QR_CODE"));
        assert!(is_qr_eligible("OPENING"));
        assert!(is_qr_eligible("STARTING"));
        assert!(!is_qr_eligible("WORKING"));
        assert!(!is_qr_eligible("STOPPED"));
        assert!(!is_qr_eligible("FAILED"));
        assert!(!is_qr_eligible("scan_qr_code"));
        assert!(!is_qr_eligible(""));
        assert!(!is_qr_eligible("SOMETHING_NEW"));
    }

    #[tokio::test]
    async fn gate_opens_when_session_awaits_scan() {
        let guard = SessionGuard::new(Arc::new(FixedStatus("SCAN_QR_CODE")));
        assert!(guard.check_qr_eligible().await.is_ok());
    }

    #[tokio::test]
    async fn gate_refusal_names_observed_status() {
        let guard = SessionGuard::new(Arc::new(FixedStatus("WORKING")));
        let err = guard.check_qr_eligible().await.unwrap_err();
        match &err {
            QrGateError::NotEligible { status } => assert_eq!(status, "WORKING"),
            other => panic!("unexpected outcome: {other}"),
        }
        assert!(err.to_string().contains("WORKING"));
    }

    #[tokio::test]
    async fn status_failure_is_surfaced_without_qr_attempt() {
        let guard = SessionGuard::new(Arc::new(FailingStatus));
        let err = guard.check_qr_eligible().await.unwrap_err();
        assert!(matches!(err, QrGateError::Status(_)));
        assert!(err.to_string().contains("gateway down"));
    }
}
