#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("authentication failed for '{username}': {reason}")]
    Auth { username: String, reason: String },

    #[error("timeout waiting for capability catalog")]
    ReadinessTimeout,

    #[error("no capabilities advertised by the service")]
    NoCapabilities,

    #[error("job failed: {0}")]
    Job(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl EngineError {
    /// Whether the worker loop may retry the current iteration.
    ///
    /// Only readiness timeouts are transient; every other error abandons
    /// the iteration immediately.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ReadinessTimeout)
    }
}

/// A credential line that does not carry all three `username|password|appId`
/// fields.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed credential line: missing {missing}")]
pub struct MalformedCredential {
    pub missing: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_auth() {
        let err = EngineError::Auth {
            username: "user@example.com".into(),
            reason: "status 401".into(),
        };
        assert_eq!(
            err.to_string(),
            "authentication failed for 'user@example.com': status 401"
        );
    }

    #[test]
    fn test_display_readiness_timeout() {
        let err = EngineError::ReadinessTimeout;
        assert_eq!(err.to_string(), "timeout waiting for capability catalog");
    }

    #[test]
    fn test_only_readiness_timeout_is_transient() {
        assert!(EngineError::ReadinessTimeout.is_transient());
        assert!(!EngineError::NoCapabilities.is_transient());
        assert!(!EngineError::Job("boom".into()).is_transient());
        assert!(!EngineError::Transport("connection reset".into()).is_transient());
        assert!(!EngineError::Auth {
            username: "u".into(),
            reason: "r".into()
        }
        .is_transient());
    }

    #[test]
    fn test_display_malformed_credential() {
        let err = MalformedCredential { missing: "password" };
        assert_eq!(err.to_string(), "malformed credential line: missing password");
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }
}
