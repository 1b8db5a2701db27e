//! Conversion between plain JSON and Firestore's typed value encoding.
//!
//! Firestore's REST API wraps every value in a single-key object naming its
//! type (`{"stringValue": "Ada"}`, `{"integerValue": "42"}`). Documents are
//! exchanged with the rest of the gateway as plain JSON maps, so every write
//! encodes and every read decodes.

use medrecords_storage::{Fields, StorageError};
use serde_json::{Map, Number, Value, json};

/// Encodes a plain JSON value into a Firestore typed value.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                // int64 travels as a decimal string
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or_default() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encodes a document's field map.
pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

/// Decodes a Firestore typed value into plain JSON.
///
/// Timestamps, references and bytes decode to their string form.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for values that are not a
/// single-key typed object or carry an unknown type tag.
pub fn decode_value(value: &Value) -> Result<Value, StorageError> {
    let obj = value
        .as_object()
        .filter(|o| o.len() == 1)
        .ok_or_else(|| StorageError::serialization(format!("malformed typed value: {value}")))?;
    let (tag, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| StorageError::serialization("empty typed value"))?;

    match tag.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| StorageError::serialization("booleanValue is not a boolean")),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(|i| Value::Number(i.into()))
                .ok_or_else(|| StorageError::serialization(format!("bad integerValue: {inner}")))
        }
        "doubleValue" => match inner {
            Value::Number(n) => Ok(Value::Number(n.clone())),
            // "NaN" / "Infinity" have no JSON representation
            Value::String(s) => Ok(s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null)),
            _ => Err(StorageError::serialization(format!(
                "bad doubleValue: {inner}"
            ))),
        },
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| StorageError::serialization(format!("{tag} is not a string"))),
        "geoPointValue" => Ok(inner.clone()),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values
                    .iter()
                    .map(decode_value)
                    .collect::<Result<Vec<_>, _>>()?,
                _ => Vec::new(),
            };
            Ok(Value::Array(values))
        }
        "mapValue" => {
            let fields = match inner.get("fields") {
                Some(Value::Object(fields)) => decode_fields(fields)?,
                _ => Map::new(),
            };
            Ok(Value::Object(fields))
        }
        other => Err(StorageError::serialization(format!(
            "unsupported value type '{other}'"
        ))),
    }
}

/// Decodes a document's typed field map.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if any field fails to decode.
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Fields, StorageError> {
    fields
        .iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
        .collect()
}
