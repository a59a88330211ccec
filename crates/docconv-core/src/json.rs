//! JSON decoder and encoder.
//!
//! Goes through `serde_json::Value` (built with `preserve_order`, so object key
//! order survives both directions).
//!
//! # Example
//! ```
//! use docconv_core::json;
//! let value = json::decode(r#"{"a": 1, "b": [2, 3]}"#).unwrap();
//! let text = json::encode(&value).unwrap();
//! assert_eq!(text, "{\n    \"a\": 1,\n    \"b\": [\n        2,\n        3\n    ]\n}");
//! ```

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::value::{Mapping, Scalar, Value};

const INDENT: &[u8] = b"    ";

/// Parse JSON text into a [`Value`].
pub fn decode(text: &str) -> Result<Value> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ConvertError::parse(Format::Json, e))?;
    Ok(from_json(json))
}

/// Serialize a [`Value`] as JSON with 4-space indentation.
pub fn encode(value: &Value) -> Result<String> {
    let json = to_json(value)?;
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    json.serialize(&mut ser)
        .map_err(|e| ConvertError::encode(Format::Json, e))?;
    String::from_utf8(buf).map_err(|e| ConvertError::encode(Format::Json, e))
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
        serde_json::Value::Number(n) => Value::Scalar(number_to_scalar(&n)),
        serde_json::Value::String(s) => Value::Scalar(Scalar::String(s)),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.into_iter().map(from_json).collect())
        }
        serde_json::Value::Object(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (k, from_json(v)))
                .collect::<Mapping>(),
        ),
    }
}

/// Integers that fit `i64` stay integers; everything else (including
/// unsigned values above `i64::MAX`) becomes a float.
fn number_to_scalar(n: &serde_json::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn to_json(value: &Value) -> Result<serde_json::Value> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Scalar(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
        Value::Scalar(Scalar::Integer(i)) => serde_json::Value::Number((*i).into()),
        Value::Scalar(Scalar::Float(f)) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| {
                ConvertError::encode(
                    Format::Json,
                    format!("cannot represent non-finite number {f}"),
                )
            })?,
        Value::Scalar(Scalar::String(s)) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<Result<_>>()?)
        }
        Value::Mapping(map) => {
            let mut obj = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                obj.insert(k.clone(), to_json(v)?);
            }
            serde_json::Value::Object(obj)
        }
    })
}
