use rotor_model::{FailureKind, Outcome};
use serde::Deserialize;

/// Graph error code for invalid or expired access tokens.
const CODE_INVALID_TOKEN: i64 = 190;
/// Graph throttling codes (app, user, page and call-rate limits).
const RATE_LIMIT_CODES: [i64; 4] = [4, 17, 32, 613];

const MAX_DETAIL_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    error: Option<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

/// Turn an HTTP status and response body into an [`Outcome`].
///
/// - 2xx → success, with the `id` field of the body when present;
/// - Graph code 190, HTTP 401, or HTTP 403 without a throttling code → `AuthError`;
/// - HTTP 429 or Graph codes 4, 17, 32, 613 → `RateLimited`;
/// - HTTP 5xx → `Transient`;
/// - anything else → `Unknown`.
pub fn classify(status: u16, body: &str) -> Outcome {
    let envelope = serde_json::from_str::<Envelope>(body).ok();

    if (200..300).contains(&status) {
        return Outcome::success(envelope.and_then(|e| e.id));
    }

    let error = envelope.and_then(|e| e.error);
    let code = error.as_ref().and_then(|e| e.code);
    let message = error
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string());

    let kind = match (status, code) {
        (_, Some(CODE_INVALID_TOKEN)) => FailureKind::AuthError,
        (_, Some(c)) if RATE_LIMIT_CODES.contains(&c) => FailureKind::RateLimited,
        (429, _) => FailureKind::RateLimited,
        (401 | 403, _) => FailureKind::AuthError,
        (500..=599, _) => FailureKind::Transient,
        _ => FailureKind::Unknown,
    };

    let detail = match code {
        Some(c) => format!("HTTP {status} (code {c}): {}", truncate(&message)),
        None => format!("HTTP {status}: {}", truncate(&message)),
    };
    Outcome::failure(kind, detail)
}

/// Transport-level failure (no HTTP response at all).
pub(crate) fn classify_transport(err: &reqwest::Error) -> Outcome {
    let kind = if err.is_timeout() || err.is_connect() {
        FailureKind::Transient
    } else {
        FailureKind::Unknown
    };
    Outcome::failure(kind, format!("request failed: {}", error_chain(err)))
}

/// `err` followed by every source that adds something to the message.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_DETAIL_CHARS {
        return s.to_string();
    }
    let mut out: String = s.chars().take(MAX_DETAIL_CHARS).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("operation timed out")]
    struct Elapsed;

    #[derive(Debug, thiserror::Error)]
    #[error("client error (Connect)")]
    struct Connect(#[source] Elapsed);

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct SendFailed(#[source] Connect);

    fn kind(outcome: &Outcome) -> Option<FailureKind> {
        match outcome {
            Outcome::Failure { kind, .. } => Some(*kind),
            Outcome::Success { .. } => None,
        }
    }

    #[test]
    fn success_carries_remote_id() {
        let out = classify(200, r#"{"id":"123_456"}"#);
        assert_eq!(out, Outcome::success(Some("123_456".into())));
    }

    #[test]
    fn success_without_json_body() {
        assert_eq!(classify(201, "ok"), Outcome::success(None));
    }

    #[test]
    fn expired_token_is_auth_error() {
        let body = r#"{"error":{"message":"Error validating access token: Session has expired","type":"OAuthException","code":190,"error_subcode":463}}"#;
        let out = classify(400, body);
        assert_eq!(kind(&out), Some(FailureKind::AuthError));
        match out {
            Outcome::Failure { detail, .. } => {
                assert!(detail.starts_with("HTTP 400 (code 190): Error validating access token"))
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn throttling_codes_are_rate_limited() {
        for code in RATE_LIMIT_CODES {
            let body = format!(r#"{{"error":{{"message":"slow down","code":{code}}}}}"#);
            assert_eq!(kind(&classify(400, &body)), Some(FailureKind::RateLimited));
        }
        // throttling wins over the generic 403 mapping
        let body = r#"{"error":{"message":"limit","code":32}}"#;
        assert_eq!(kind(&classify(403, body)), Some(FailureKind::RateLimited));
        assert_eq!(kind(&classify(429, "")), Some(FailureKind::RateLimited));
    }

    #[test]
    fn status_fallbacks() {
        assert_eq!(kind(&classify(401, "")), Some(FailureKind::AuthError));
        assert_eq!(kind(&classify(403, "forbidden")), Some(FailureKind::AuthError));
        assert_eq!(kind(&classify(502, "<html>bad gateway</html>")), Some(FailureKind::Transient));
        assert_eq!(kind(&classify(400, r#"{"error":{"code":100}}"#)), Some(FailureKind::Unknown));
        assert_eq!(kind(&classify(404, "")), Some(FailureKind::Unknown));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(1000);
        match classify(500, &body) {
            Outcome::Failure { detail, .. } => {
                assert!(detail.chars().count() < 220);
                assert!(detail.ends_with('…'));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn transport_detail_keeps_the_source_chain() {
        let chain = error_chain(&SendFailed(Connect(Elapsed)));
        assert_eq!(
            chain,
            "error sending request: client error (Connect): operation timed out"
        );
    }

    #[test]
    fn transport_detail_skips_repeated_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("connect failed: operation timed out")]
        struct Verbose(#[source] Elapsed);

        assert_eq!(
            error_chain(&Verbose(Elapsed)),
            "connect failed: operation timed out"
        );
    }
}
