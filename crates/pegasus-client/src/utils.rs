//! Lenient accessors for API JSON.
//!
//! Different endpoints spell the same field differently (`favoriteId` /
//! `favorite_id` / `id`, `views_count` / `view_count` / `views`). These
//! helpers pick the first key present, in the caller's order of preference.

use serde_json::Value;

/// First non-null value among `keys`.
pub(crate) fn first_value<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find(|v| !v.is_null())
}

/// First non-empty string among `keys`.
pub(crate) fn first_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

/// First value among `keys` that reads as a non-negative counter.
///
/// Accepts integers, floats (truncated) and numeric strings.
pub(crate) fn first_count(value: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(as_count)
}

pub(crate) fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truthy reading of a flag: `true`, non-zero numbers, `"true"`/`"1"`.
pub(crate) fn as_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(s.as_str(), "true" | "1"),
        _ => false,
    }
}

/// Items of a list response, whether bare (`[...]`) or wrapped (`{"<key>": [...]}`).
pub(crate) fn list_items<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a Vec<Value>> {
    if let Some(items) = body.as_array() {
        return Some(items);
    }
    keys.iter()
        .find_map(|key| body.get(key).and_then(Value::as_array))
}
