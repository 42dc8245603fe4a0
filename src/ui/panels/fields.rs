//! Tolerant JSON field access. Missing or mistyped fields fall back to a default.

use crate::api::error::DataError;
use log::debug;
use serde_json::Value;

pub(crate) trait FieldExt {
    fn f64_or(&self, key: &str, default: f64) -> f64;
    fn i64_or(&self, key: &str, default: i64) -> i64;
    fn str_or(&self, key: &str, default: &str) -> String;
    fn bool_or(&self, key: &str, default: bool) -> bool;
    /// Array under `key`, or an empty slice.
    fn items(&self, key: &str) -> &[Value];
    /// Numeric array under `key`; non-numeric entries are skipped.
    fn series(&self, key: &str) -> Vec<f64>;
}

fn mistyped<T>(key: &str, value: &Value, default: T) -> T {
    debug!("field '{}' has unexpected value {}, using default", key, value);
    default
}

impl FieldExt for Value {
    fn f64_or(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            None | Some(Value::Null) => default,
            Some(v) => v
                .as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
                .unwrap_or_else(|| mistyped(key, v, default)),
        }
    }

    fn i64_or(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            None | Some(Value::Null) => default,
            Some(v) => v
                .as_i64()
                .or_else(|| v.as_f64().map(|f| f as i64))
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
                .unwrap_or_else(|| mistyped(key, v, default)),
        }
    }

    fn str_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            None | Some(Value::Null) => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
            Some(v) => mistyped(key, v, default.to_string()),
        }
    }

    fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            None | Some(Value::Null) => default,
            Some(v) => v.as_bool().unwrap_or_else(|| mistyped(key, v, default)),
        }
    }

    fn items(&self, key: &str) -> &[Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn series(&self, key: &str) -> Vec<f64> {
        self.items(key).iter().filter_map(Value::as_f64).collect()
    }
}

/// The document must be a JSON object for any field to be read from it.
pub(crate) fn require_object<'a>(doc: &'a Value, endpoint: &str) -> Result<&'a Value, DataError> {
    if doc.is_object() {
        Ok(doc)
    } else {
        Err(DataError::malformed(endpoint, "expected a JSON object"))
    }
}

/// Accepts either a bare array or an object carrying the array under `key`.
pub(crate) fn require_list<'a>(
    doc: &'a Value,
    key: &str,
    endpoint: &str,
) -> Result<&'a [Value], DataError> {
    match doc {
        Value::Array(items) => Ok(items.as_slice()),
        Value::Object(_) => Ok(doc.items(key)),
        _ => Err(DataError::malformed(
            endpoint,
            format!("expected an array or an object with '{}'", key),
        )),
    }
}
