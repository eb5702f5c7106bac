//! Success-body field extraction

use super::classify::classify;
use crate::error::{Error, Result};
use crate::types::{ActionKind, HttpResponse};
use serde_json::Value;
use std::collections::BTreeMap;

/// Where an output value comes from in the response body
#[derive(Debug, Clone, Copy)]
enum Source {
    /// JSON pointer into the body
    Pointer(&'static str),
    /// `approvedAt` of the most recent entry in `approvals`
    LastApproval,
}

const CREATE_RELEASE_OUTPUTS: &[(&str, Source)] = &[
    ("releases-created", Source::Pointer("/releasesCreated")),
    ("releases-auto-deployed", Source::Pointer("/releasesAutoDeployed")),
    ("service-id", Source::Pointer("/serviceId")),
    ("service-name", Source::Pointer("/serviceName")),
];

const APPROVE_OUTPUTS: &[(&str, Source)] = &[
    ("status", Source::Pointer("/status")),
    ("approved-at", Source::LastApproval),
];

const DEPLOY_OUTPUTS: &[(&str, Source)] = &[
    ("status", Source::Pointer("/status")),
    ("deployed-at", Source::Pointer("/deployedAt")),
];

const ROLLBACK_OUTPUTS: &[(&str, Source)] = &[
    ("release-id", Source::Pointer("/id")),
    ("status", Source::Pointer("/status")),
];

fn output_table(kind: ActionKind) -> &'static [(&'static str, Source)] {
    match kind {
        ActionKind::CreateRelease => CREATE_RELEASE_OUTPUTS,
        ActionKind::Approve => APPROVE_OUTPUTS,
        ActionKind::Deploy => DEPLOY_OUTPUTS,
        ActionKind::Rollback => ROLLBACK_OUTPUTS,
    }
}

/// Names of the data outputs an action publishes on success (excluding `success`)
pub fn output_names(kind: ActionKind) -> impl Iterator<Item = &'static str> {
    output_table(kind).iter().map(|(name, _)| *name)
}

/// A 2xx response reduced to outputs, with the parsed body kept for logging
#[derive(Debug, Clone, PartialEq)]
pub struct MappedResponse {
    /// Data outputs, always one entry per declared output
    pub outputs: BTreeMap<String, String>,
    /// Parsed response body
    pub body: Value,
}

impl MappedResponse {
    /// Server's human-readable `message`, if any
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

/// Per-target row of a create-release response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSummary {
    /// Deployment target the release was created for
    pub target_name: String,
    /// Server-side release status
    pub status: String,
    /// Deployed without waiting
    pub auto_deployed: bool,
    /// Held for a manual approval
    pub requires_approval: bool,
}

impl ReleaseSummary {
    /// Rows from the optional `releases` array
    pub fn from_body(body: &Value) -> Vec<ReleaseSummary> {
        body.get("releases")
            .and_then(Value::as_array)
            .map(|releases| {
                releases
                    .iter()
                    .map(|r| ReleaseSummary {
                        target_name: field_string(r.get("targetName")),
                        status: field_string(r.get("status")),
                        auto_deployed: r.get("autoDeployed").and_then(Value::as_bool).unwrap_or(false),
                        requires_approval: r
                            .get("requiresApproval")
                            .and_then(Value::as_bool)
                            .unwrap_or(false),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Map a transport response to outputs or a classified error
///
/// Non-2xx statuses are classified; a 2xx body with `"success": false` is a
/// domain failure for every action. Absent fields map to `""`.
pub fn map_response(kind: ActionKind, response: &HttpResponse) -> Result<MappedResponse> {
    if !response.is_success() {
        return Err(classify(kind, response.status, &response.body));
    }

    let body = parse_body(&response.body)?;

    if body.get("success") == Some(&Value::Bool(false)) {
        let reason = ["message", "error"]
            .iter()
            .filter_map(|key| body.get(*key))
            .map(|v| field_string(Some(v)))
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| "no message returned".to_string());
        return Err(Error::DomainFailure(format!(
            "{} failed: {}",
            kind.failure_prefix(),
            reason
        )));
    }

    let outputs = output_table(kind)
        .iter()
        .map(|(name, source)| (name.to_string(), extract(&body, *source)))
        .collect();

    Ok(MappedResponse { outputs, body })
}

fn parse_body(raw: &str) -> Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw)
        .map_err(|e| Error::Unknown(format!("Failed to parse API response: {}", e)))
}

fn extract(body: &Value, source: Source) -> String {
    match source {
        Source::Pointer(ptr) => field_string(body.pointer(ptr)),
        Source::LastApproval => field_string(
            body.get("approvals")
                .and_then(Value::as_array)
                .and_then(|approvals| approvals.last())
                .and_then(|last| last.get("approvedAt")),
        ),
    }
}

/// Render a JSON field as an output string; absent and null become `""`
pub fn field_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(200, body)
    }

    #[test]
    fn test_approve_outputs() {
        let mapped = map_response(
            ActionKind::Approve,
            &ok(r#"{"status":"approved","approvals":[{"approvedAt":"2023-12-31T00:00:00Z"},{"approvedAt":"2024-01-01T00:00:00Z"}]}"#),
        )
        .unwrap();
        assert_eq!(mapped.outputs["status"], "approved");
        assert_eq!(mapped.outputs["approved-at"], "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_approve_without_approvals() {
        let mapped = map_response(ActionKind::Approve, &ok(r#"{"status":"pending"}"#)).unwrap();
        assert_eq!(mapped.outputs["approved-at"], "");

        let mapped = map_response(ActionKind::Approve, &ok(r#"{"status":"pending","approvals":[]}"#)).unwrap();
        assert_eq!(mapped.outputs["approved-at"], "");
    }

    #[test]
    fn test_create_release_outputs_stringify_numbers() {
        let mapped = map_response(
            ActionKind::CreateRelease,
            &ok(r#"{"success":true,"message":"Created 2 releases","releasesCreated":2,"releasesAutoDeployed":1,"serviceId":"svc_1","serviceName":"checkout"}"#),
        )
        .unwrap();
        assert_eq!(mapped.outputs["releases-created"], "2");
        assert_eq!(mapped.outputs["releases-auto-deployed"], "1");
        assert_eq!(mapped.outputs["service-id"], "svc_1");
        assert_eq!(mapped.outputs["service-name"], "checkout");
        assert_eq!(mapped.message(), Some("Created 2 releases"));
    }

    #[test]
    fn test_missing_fields_are_empty() {
        for kind in ActionKind::ALL {
            let mapped = map_response(kind, &ok("{}")).unwrap();
            for name in output_names(kind) {
                assert_eq!(mapped.outputs[name], "", "{kind}: {name}");
            }
        }
    }

    #[test]
    fn test_empty_body_is_empty_object() {
        let mapped = map_response(ActionKind::Deploy, &HttpResponse::new(204, "")).unwrap();
        assert_eq!(mapped.outputs["status"], "");
        assert_eq!(mapped.outputs["deployed-at"], "");
    }

    #[test]
    fn test_deploy_and_rollback_outputs() {
        let mapped = map_response(
            ActionKind::Deploy,
            &ok(r#"{"status":"deployed","deployedAt":"2024-02-02T10:00:00Z"}"#),
        )
        .unwrap();
        assert_eq!(mapped.outputs["status"], "deployed");
        assert_eq!(mapped.outputs["deployed-at"], "2024-02-02T10:00:00Z");

        let mapped = map_response(ActionKind::Rollback, &ok(r#"{"id":1234,"status":"rolling_back"}"#)).unwrap();
        assert_eq!(mapped.outputs["release-id"], "1234");
        assert_eq!(mapped.outputs["status"], "rolling_back");
    }

    #[test]
    fn test_success_false_is_domain_failure_for_every_action() {
        for kind in ActionKind::ALL {
            let err = map_response(kind, &ok(r#"{"success":false,"message":"x"}"#)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DomainFailure);
            assert_eq!(err.to_string(), format!("{} failed: x", kind.failure_prefix()));
        }
    }

    #[test]
    fn test_success_false_without_message() {
        let err = map_response(ActionKind::CreateRelease, &ok(r#"{"success":false}"#)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Release creation failed: no message returned"
        );
    }

    #[test]
    fn test_success_string_false_is_not_domain_failure() {
        let mapped = map_response(ActionKind::Deploy, &ok(r#"{"success":"false","status":"deployed"}"#)).unwrap();
        assert_eq!(mapped.outputs["status"], "deployed");
    }

    #[test]
    fn test_invalid_json_is_unknown() {
        let err = map_response(ActionKind::Deploy, &ok("<html>gateway</html>")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert!(err.to_string().starts_with("Error: Failed to parse API response"));
    }

    #[test]
    fn test_non_success_status_is_classified() {
        let err = map_response(ActionKind::Approve, &HttpResponse::new(401, "")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
    }

    #[test]
    fn test_release_summaries() {
        let body: Value = serde_json::from_str(
            r#"{"releases":[
                {"targetName":"staging","status":"deployed","autoDeployed":true,"requiresApproval":false},
                {"targetName":"production","status":"pending_approval","requiresApproval":true}
            ]}"#,
        )
        .unwrap();
        let rows = ReleaseSummary::from_body(&body);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].target_name, "staging");
        assert!(rows[0].auto_deployed);
        assert!(!rows[1].auto_deployed);
        assert!(rows[1].requires_approval);

        assert!(ReleaseSummary::from_body(&serde_json::json!({})).is_empty());
    }

    #[test]
    fn test_field_string() {
        assert_eq!(field_string(None), "");
        assert_eq!(field_string(Some(&Value::Null)), "");
        assert_eq!(field_string(Some(&serde_json::json!(true))), "true");
        assert_eq!(field_string(Some(&serde_json::json!(1.5))), "1.5");
        assert_eq!(field_string(Some(&serde_json::json!("s"))), "s");
    }
}
