use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use rand::{Rng, distr::Alphanumeric};
use serde_json::Value;
use sha2::{Digest, Sha256};

pub const NAME_SEPARATOR: &str = ", ";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Walks `path` through nested objects. Anything missing, null or not an
/// object along the way yields `None`.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
    }
    if current.is_null() { None } else { Some(current) }
}

/// Like [`lookup`], but always returns a scalar cell value.
///
/// Missing fields become `Value::Null`; objects and arrays are rendered to
/// their JSON text so a row never carries nested data.
pub fn scalar(value: &Value, path: &[&str]) -> Value {
    match lookup(value, path) {
        None => Value::Null,
        Some(v @ (Value::Array(_) | Value::Object(_))) => Value::String(v.to_string()),
        Some(v) => v.clone(),
    }
}

/// Joins the `key` field of every object in the list at `path`,
/// e.g. artist names into `"A, B, C"`. No names at all yields `Value::Null`.
pub fn join_names(value: &Value, path: &[&str], key: &str) -> Value {
    let names: Vec<&str> = lookup(value, path)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get(key).and_then(Value::as_str))
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if names.is_empty() {
        Value::Null
    } else {
        Value::String(names.join(NAME_SEPARATOR))
    }
}

/// Joins a list of plain strings (genres, languages). An empty or missing
/// list yields an empty string.
pub fn join_strings(value: &Value, path: &[&str]) -> Value {
    let joined = lookup(value, path)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(NAME_SEPARATOR)
        })
        .unwrap_or_default();
    Value::String(joined)
}

/// Normalizes an RFC 3339 timestamp to `YYYY-MM-DD HH:MM:SS` in UTC.
/// Input that does not parse is returned unchanged.
pub fn normalize_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Renders a cell value the way it appears in a CSV file.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
