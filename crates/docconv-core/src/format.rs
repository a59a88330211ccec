//! Format detection and dispatch.
//!
//! A format is chosen purely from the file extension, compared exactly as
//! supplied (`data.JSON` is not JSON). Adding a format means adding a variant
//! here; every dispatch site is an exhaustive `match`.

use std::fmt;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::value::Value;
use crate::{json, xml, yaml};

/// A supported document encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Xml,
}

impl Format {
    /// Map an extension (without the leading dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext {
            "json" => Some(Format::Json),
            "yml" | "yaml" => Some(Format::Yaml),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    /// Detect the format of `path` from its extension.
    pub fn detect(path: &Path) -> Result<Format> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Format::from_extension(ext).ok_or_else(|| ConvertError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: if ext.is_empty() {
                String::new()
            } else {
                format!(".{ext}")
            },
        })
    }

    /// Parse `text` in this format into a [`Value`].
    pub fn decode(self, text: &str) -> Result<Value> {
        match self {
            Format::Json => json::decode(text),
            Format::Yaml => yaml::decode(text),
            Format::Xml => xml::decode(text),
        }
    }

    /// Serialize `value` in this format.
    pub fn encode(self, value: &Value) -> Result<String> {
        match self {
            Format::Json => json::encode(value),
            Format::Yaml => yaml::encode(value),
            Format::Xml => xml::encode(value),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "JSON",
            Format::Yaml => "YAML",
            Format::Xml => "XML",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
