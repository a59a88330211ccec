//! YAML decoder and encoder.
//!
//! Parsing goes through `serde_yaml::Value`, which only ever builds plain
//! data: tags are recorded, never executed, and this module drops them.
//! Anchors and aliases are resolved by the parser and not preserved.

use serde::Deserialize;

use crate::error::{ConvertError, Result};
use crate::format::Format;
use crate::value::{Mapping, Scalar, Value};

/// Parse the first document of a YAML stream into a [`Value`].
///
/// Merge keys (`<<: *base`) are applied. An empty stream decodes to
/// [`Value::Null`]. Any further documents are ignored.
pub fn decode(text: &str) -> Result<Value> {
    let mut documents = serde_yaml::Deserializer::from_str(text);
    let Some(first) = documents.next() else {
        return Ok(Value::Null);
    };
    let mut yaml = serde_yaml::Value::deserialize(first)
        .map_err(|e| ConvertError::parse(Format::Yaml, e))?;
    yaml.apply_merge()
        .map_err(|e| ConvertError::parse(Format::Yaml, e))?;
    if documents.next().is_some() {
        tracing::warn!("YAML stream has more than one document; only the first is converted");
    }
    from_yaml(yaml)
}

/// Serialize a [`Value`] as block-style YAML.
pub fn encode(value: &Value) -> Result<String> {
    serde_yaml::to_string(&to_yaml(value)).map_err(|e| ConvertError::encode(Format::Yaml, e))
}

fn from_yaml(yaml: serde_yaml::Value) -> Result<Value> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
        serde_yaml::Value::Number(n) => Value::Scalar(number_to_scalar(&n)),
        serde_yaml::Value::String(s) => Value::Scalar(Scalar::String(s)),
        serde_yaml::Value::Sequence(items) => Value::Sequence(
            items
                .into_iter()
                .map(from_yaml)
                .collect::<Result<Vec<_>>>()?,
        ),
        serde_yaml::Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (k, v) in map {
                let key = key_text(k)?;
                if let Some(previous) = out.insert(key.clone(), from_yaml(v)?) {
                    tracing::warn!(
                        key = %key,
                        discarded = ?previous,
                        "distinct YAML keys share the same text; last one wins"
                    );
                }
            }
            Value::Mapping(out)
        }
        serde_yaml::Value::Tagged(tagged) => {
            tracing::debug!(tag = %tagged.tag, "dropping YAML tag");
            from_yaml(tagged.value)?
        }
    })
}

fn number_to_scalar(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i)
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Mapping keys become strings; scalar keys use their canonical text.
fn key_text(key: serde_yaml::Value) -> Result<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(number_to_scalar(&n).to_text()),
        serde_yaml::Value::Tagged(tagged) => key_text(tagged.value),
        other => Err(ConvertError::parse(
            Format::Yaml,
            format!("unsupported mapping key {other:?}; keys must be scalars"),
        )),
    }
}

fn to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Scalar(Scalar::Bool(b)) => serde_yaml::Value::Bool(*b),
        Value::Scalar(Scalar::Integer(i)) => serde_yaml::Value::Number((*i).into()),
        Value::Scalar(Scalar::Float(f)) => serde_yaml::Value::Number((*f).into()),
        Value::Scalar(Scalar::String(s)) => serde_yaml::Value::String(s.clone()),
        Value::Sequence(items) => serde_yaml::Value::Sequence(items.iter().map(to_yaml).collect()),
        Value::Mapping(map) => {
            let mut out = serde_yaml::Mapping::with_capacity(map.len());
            for (k, v) in map {
                out.insert(serde_yaml::Value::String(k.clone()), to_yaml(v));
            }
            serde_yaml::Value::Mapping(out)
        }
    }
}
