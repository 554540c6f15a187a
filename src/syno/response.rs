//! Classification of create-task responses.

use serde_json::Value;

use super::is_success;
use crate::types::Outcome;

/// Code used when the response carries none
pub const UNKNOWN_CODE: &str = "unknown";
/// Message used when the response carries none
pub const NO_ERROR_MESSAGE: &str = "No error message.";

/// Classify a parsed create-task response
///
/// `Success` iff the top-level `success` flag is `true`. Otherwise the code is
/// `error.code` (number or string) or `"unknown"`, and the message is
/// `error.message`, else the `error` value itself when it says more than its
/// code, else `"No error message."`. Total over every JSON value.
pub fn interpret(raw: &Value) -> Outcome {
    if is_success(raw) {
        return Outcome::Success;
    }

    let error = raw.get("error").filter(|e| !e.is_null());

    let code = error
        .and_then(|e| e.get("code"))
        .and_then(code_text)
        .unwrap_or_else(|| UNKNOWN_CODE.to_string());

    let message = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .or_else(|| error.and_then(describe_error))
        .unwrap_or_else(|| NO_ERROR_MESSAGE.to_string());

    Outcome::Failure { code, message }
}

fn code_text(code: &Value) -> Option<String> {
    match code {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Stringified error value, skipped when it holds nothing beyond its code
fn describe_error(error: &Value) -> Option<String> {
    match error {
        Value::Object(map) if map.keys().all(|k| k == "code") => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
