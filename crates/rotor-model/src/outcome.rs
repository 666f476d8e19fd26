use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a failed remote attempt.
///
/// The worker reacts to the kind, never to the raw protocol response:
/// - [`FailureKind::AuthError`] revokes the credential that was used;
/// - every other kind only feeds the consecutive-failure counter (and thus backoff).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Credential rejected or expired.
    AuthError,
    /// Remote side asked us to slow down.
    RateLimited,
    /// Timeouts, connection resets, 5xx.
    Transient,
    /// Anything the collaborator could not classify.
    Unknown,
}

impl FailureKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            FailureKind::AuthError => "auth_error",
            FailureKind::RateLimited => "rate_limited",
            FailureKind::Transient => "transient",
            FailureKind::Unknown => "unknown",
        }
    }

    /// Whether the credential used for the attempt must be revoked.
    pub fn revokes_credential(&self) -> bool {
        matches!(self, FailureKind::AuthError)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Classified result of one remote call attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "result")]
pub enum Outcome {
    /// The write was accepted.
    Success {
        /// Identifier assigned by the remote side, if it returned one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        remote_id: Option<String>,
    },
    /// The write was rejected or never completed.
    Failure {
        kind: FailureKind,
        detail: String,
    },
}

impl Outcome {
    pub fn success(remote_id: Option<String>) -> Self {
        Outcome::Success { remote_id }
    }

    pub fn failure(kind: FailureKind, detail: impl Into<String>) -> Self {
        Outcome::Failure {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Short label for metrics: `success` or the failure kind label.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Success { .. } => "success",
            Outcome::Failure { kind, .. } => kind.as_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_auth_error_revokes() {
        assert!(FailureKind::AuthError.revokes_credential());
        assert!(!FailureKind::RateLimited.revokes_credential());
        assert!(!FailureKind::Transient.revokes_credential());
        assert!(!FailureKind::Unknown.revokes_credential());
    }

    #[test]
    fn labels() {
        assert_eq!(Outcome::success(None).as_label(), "success");
        assert_eq!(
            Outcome::failure(FailureKind::RateLimited, "slow down").as_label(),
            "rate_limited"
        );
    }

    #[test]
    fn failure_serializes_with_tag() {
        let out = Outcome::failure(FailureKind::AuthError, "expired");
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains(r#""result":"failure""#));
        assert!(json.contains(r#""kind":"authError""#));
    }

    #[test]
    fn success_fields_are_camel_case() {
        let out = Outcome::success(Some("123_456".into()));
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"result":"success","remoteId":"123_456"}"#);
        let back: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, out);
    }
}
