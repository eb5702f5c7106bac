//! JSON and plain-text renderings of an action result

use crate::types::{ActionKind, ActionResult};
use serde_json::{json, Value};
use std::fmt::Write;

/// Full result as a JSON document
pub fn result_json(kind: ActionKind, result: &ActionResult) -> Value {
    let error = result.error().map(|e| {
        json!({
            "kind": e.kind().as_str(),
            "message": e.to_string(),
        })
    });

    json!({
        "action": kind.as_str(),
        "success": result.is_success(),
        "outputs": result.outputs(),
        "error": error,
    })
}

/// Human-readable summary
pub fn result_text(kind: ActionKind, result: &ActionResult) -> String {
    let mut buf = String::new();
    let title = format!("Kubigo {}", kind);
    let _ = writeln!(buf, "{}", title);
    let _ = writeln!(buf, "{}", "=".repeat(title.len()));

    if let Some(message) = result.failure_message() {
        let _ = writeln!(buf, "Failed: {}", message);
        return buf;
    }

    let width = result.outputs().keys().map(String::len).max().unwrap_or(0);
    for (name, value) in result.outputs() {
        let _ = writeln!(buf, "{:width$}  {}", name, value, width = width);
    }
    buf
}
