//! Answer map helpers shared by the renderer and the form engine

use serde_json::Value;
use std::collections::HashMap;

/// Flat field-name → scalar-answer map. An absent key means "not yet
/// answered"; so do `null` and the empty string.
pub type Answers = HashMap<String, Value>;

/// Canonical text of an answer, or `None` when it is blank.
///
/// Strings render verbatim; numbers and booleans use their default,
/// locale-independent `Display`. Locale formatting belongs to whoever
/// produced the value, not to the engine.
pub fn answer_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Non-scalars are not expected in an answer map; compact JSON keeps
        // the conversion total.
        other => Some(other.to_string()),
    }
}

/// Numeric reading of an answer, accepting both JSON numbers and numeric text
pub fn answer_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// True when the map holds a non-blank answer for `name`
pub fn is_answered(answers: &Answers, name: &str) -> bool {
    answers.get(name).and_then(answer_text).is_some()
}
