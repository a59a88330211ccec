//! Error types for detection, decoding, encoding and file handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::Format;

/// Errors that can occur during a conversion.
///
/// Every variant is terminal for the conversion that produced it; nothing in
/// this crate retries or recovers internally.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The path's extension is not one of `.json`, `.yml`, `.yaml`, `.xml`.
    #[error("Unsupported file format '{extension}' for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The input path does not exist or is not a regular file.
    #[error("No such file: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input text is not well-formed for its format.
    /// The underlying parser's message is kept verbatim.
    #[error("{format} parse error: {message}")]
    Parse { format: Format, message: String },

    /// The value's shape cannot be expressed in the target format.
    #[error("Structure error: {0}")]
    Structure(String),

    /// The value is structurally fine but contains something the target
    /// format cannot represent (e.g. a non-finite float in JSON).
    #[error("{format} encoding error: {message}")]
    Encode { format: Format, message: String },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(crate) fn parse(format: Format, message: impl ToString) -> Self {
        ConvertError::Parse {
            format,
            message: message.to_string(),
        }
    }

    pub(crate) fn encode(format: Format, message: impl ToString) -> Self {
        ConvertError::Encode {
            format,
            message: message.to_string(),
        }
    }
}

/// Convenience alias used throughout docconv-core.
pub type Result<T> = std::result::Result<T, ConvertError>;
