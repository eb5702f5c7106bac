//! Status-code driven error classification
//!
//! A priority-ordered rule table; the first rule whose predicate matches the
//! status builds the error, and anything unmatched falls through to
//! [`Error::Api`].

use crate::error::Error;
use crate::types::ActionKind;

/// One classification rule
struct Rule {
    applies: fn(u16) -> bool,
    build: fn(ActionKind, &str) -> Error,
}

static RULES: [Rule; 3] = [
    Rule {
        applies: is_unauthorized,
        build: auth_error,
    },
    Rule {
        applies: is_not_found,
        build: not_found_error,
    },
    Rule {
        applies: is_bad_request,
        build: request_error,
    },
];

fn is_unauthorized(status: u16) -> bool {
    status == 401
}

fn is_not_found(status: u16) -> bool {
    status == 404
}

fn is_bad_request(status: u16) -> bool {
    status == 400
}

fn auth_error(_: ActionKind, _: &str) -> Error {
    Error::Auth
}

fn not_found_error(kind: ActionKind, _: &str) -> Error {
    Error::NotFound(kind.not_found_message().to_string())
}

fn request_error(kind: ActionKind, body: &str) -> Error {
    Error::Request(format!(
        "{} failed: {}",
        kind.failure_prefix(),
        server_message(body)
    ))
}

/// Classify a non-2xx response
///
/// Pure function of action, status and body.
pub fn classify(kind: ActionKind, status: u16, body: &str) -> Error {
    RULES
        .iter()
        .find(|rule| (rule.applies)(status))
        .map(|rule| (rule.build)(kind, body))
        .unwrap_or_else(|| Error::Api {
            status,
            body: body.to_string(),
        })
}

/// Best human-readable message in an error body
///
/// Prefers a JSON `error` field, then `message`, then the raw body.
pub fn server_message(body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = parsed.as_ref().and_then(|v| {
        ["error", "message"]
            .iter()
            .filter_map(|key| v.get(*key))
            .find(|f| !f.is_null())
    });

    match field {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(other) if !other.is_string() => other.to_string(),
        _ => {
            let raw = body.trim();
            if raw.is_empty() {
                "(empty response body)".to_string()
            } else {
                raw.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use assert_matches::assert_matches;

    #[test]
    fn test_401_is_auth_for_every_action() {
        for kind in ActionKind::ALL {
            let err = classify(kind, 401, r#"{"error":"bad key"}"#);
            assert_matches!(err, Error::Auth);
        }
    }

    #[test]
    fn test_404_messages_are_resource_specific() {
        assert_eq!(
            classify(ActionKind::CreateRelease, 404, "").to_string(),
            "Service not found. Verify repository URL and branch match your Kubigo service configuration."
        );
        assert_eq!(
            classify(ActionKind::Approve, 404, "").to_string(),
            "Release not found. Please verify the release ID."
        );
        assert_eq!(
            classify(ActionKind::Deploy, 404, "").to_string(),
            "Release not found. Please verify the release ID."
        );
        assert_eq!(
            classify(ActionKind::Rollback, 404, "").to_string(),
            "Target not found. Please verify the target ID."
        );
    }

    #[test]
    fn test_400_surfaces_server_error() {
        let err = classify(
            ActionKind::Approve,
            400,
            r#"{"error":"Release is not pending approval"}"#,
        );
        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(
            err.to_string(),
            "Approval failed: Release is not pending approval"
        );
    }

    #[test]
    fn test_400_falls_back_to_message_then_raw_body() {
        let err = classify(ActionKind::Deploy, 400, r#"{"message":"target locked"}"#);
        assert_eq!(err.to_string(), "Deployment failed: target locked");

        let err = classify(ActionKind::Rollback, 400, r#"{"code":7}"#);
        assert_eq!(err.to_string(), r#"Rollback failed: {"code":7}"#);

        let err = classify(ActionKind::Rollback, 400, "plain text problem");
        assert_eq!(err.to_string(), "Rollback failed: plain text problem");
    }

    #[test]
    fn test_other_status_is_api_error() {
        let err = classify(ActionKind::CreateRelease, 500, r#"{"error":"boom"}"#);
        assert_matches!(err, Error::Api { status: 500, ref body } if body == r#"{"error":"boom"}"#);
        assert_eq!(err.to_string(), r#"API Error (500): {"error":"boom"}"#);

        let err = classify(ActionKind::Deploy, 403, "");
        assert_eq!(err.kind(), ErrorKind::Api);
    }

    #[test]
    fn test_server_message_structured_error() {
        assert_eq!(
            server_message(r#"{"error":{"code":"E1"}}"#),
            r#"{"code":"E1"}"#
        );
        assert_eq!(server_message("   "), "(empty response body)");
        assert_eq!(server_message(r#"{"error":null,"message":"m"}"#), "m");
    }
}
