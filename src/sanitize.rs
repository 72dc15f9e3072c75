use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Drop anything that looks like an HTML tag, then trim.
pub fn strip_tags(raw: &str) -> String {
    TAG_RE.replace_all(raw, "").trim().to_string()
}

/// Recursively strip tags from every string inside `value`. Other scalars pass through.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(strip_tags(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_value(v)))
                .collect(),
        ),
        other => other,
    }
}
