//! `@default` value interpretation.

use serde_json::Value;

/// Interpret the text of a `@default` tag.
///
/// `true`, `false`, `null`, `''` and `[]` map to their typed values,
/// numbers and JSON lists/maps are parsed, anything else stays a string
/// (surrounding quotes removed).
pub(crate) fn interpret_default(text: &str) -> Value {
    let text = text.trim();
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        "''" | "\"\"" => return Value::String(String::new()),
        "[]" => return Value::Array(Vec::new()),
        _ => {}
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(f) = text.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    if text.starts_with('[') || text.starts_with('{') {
        if let Ok(v) = serde_json::from_str(text) {
            return v;
        }
    }
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| text.strip_prefix(*q).and_then(|t| t.strip_suffix(*q)))
        .unwrap_or(text);
    Value::String(unquoted.to_string())
}
