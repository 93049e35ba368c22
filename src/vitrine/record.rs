//! # Entity Records
//!
//! Records are opaque JSON objects owned by the host. The engine only reads
//! what descriptors ask for, through dot-separated key paths:
//!
//! ```text
//! "customer.address.city"   -> record["customer"]["address"]["city"]
//! "items.0.sku"             -> record["items"][0]["sku"]
//! ```
//!
//! A lookup stops at the first missing segment and yields the shared
//! [`NULL`] sentinel, so renderers never see a partial path as an error.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Sentinel returned for absent key paths.
pub static NULL: Value = Value::Null;

/// Resolves a dot-separated key path against a record.
pub fn lookup<'a>(record: &'a Value, path: &str) -> &'a Value {
    if path.is_empty() {
        return &NULL;
    }

    let mut current = record;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return &NULL,
        }
    }
    current
}

/// Writes `value` at a dot-separated key path, creating intermediate objects.
///
/// Intermediate segments that exist but are not objects are replaced by
/// objects; the record itself becomes an object if it was not one.
pub fn assign(record: &mut Value, path: &str, value: Value) {
    if path.is_empty() {
        return;
    }

    let mut current = record;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

/// The record's `id`, rendered as a string. Numbers and strings are accepted.
pub fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Raw display form of a value: strings unquoted, `null` empty, arrays joined.
pub fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Loose scalar equality: `10` equals `"10"`, `true` equals `"true"`.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    a == b || (!a.is_object() && !b.is_object() && display(a) == display(b))
}

/// Reads a number out of a number or numeric string.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Deserializes any JSON scalar into its display string (used for option values).
pub(crate) fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(display(&value))
}
