//! Responses arrive either bare or wrapped as `{ "data": ... }`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::ApiError;

/// Strip a `{ data: X }` wrapper when `X` is present and non-null.
pub fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut obj) if obj.get("data").is_some_and(|d| !d.is_null()) => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

pub fn decode_one<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(unwrap_envelope(value)).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Reply to a mutation. Servers may echo the updated record or merely
/// acknowledge (`null`, `{ "message": ... }`); anything without an `id`
/// decodes to `None`.
pub fn decode_ack<T: DeserializeOwned>(value: Value) -> Result<Option<T>, ApiError> {
    match unwrap_envelope(value) {
        Value::Object(obj) if obj.get("id").is_some_and(|id| !id.is_null()) => {
            serde_json::from_value(Value::Object(obj)).map(Some).map_err(|e| ApiError::Decode(e.to_string()))
        }
        _ => Ok(None),
    }
}

/// Like [`decode_one`] but an empty payload (`null` or `{ data: null }`)
/// decodes to an empty list.
pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ApiError> {
    match unwrap_envelope(value) {
        Value::Null => Ok(Vec::new()),
        Value::Object(obj) if obj.len() == 1 && obj.get("data").is_some_and(Value::is_null) => Ok(Vec::new()),
        other => serde_json::from_value(other).map_err(|e| ApiError::Decode(e.to_string())),
    }
}
