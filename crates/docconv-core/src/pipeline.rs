//! The conversion pipeline: detect → decode → detect → encode → write.
//!
//! Stages run strictly in order and any failure is terminal. The output file
//! is only touched after the whole document has been encoded, so a failed
//! conversion never leaves a partial file behind.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::format::Format;

/// Knobs for [`convert_file`].
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Validate the output extension before reading the input.
    ///
    /// Off by default: the output format is only detected after the input has
    /// been decoded, so a bad output extension surfaces after any input error.
    pub check_output_first: bool,
}

/// Pipeline stages, in the order they are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    DetectedInput,
    Decoded,
    DetectedOutput,
    Encoded,
    Written,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::DetectedInput => "detected-input",
            Stage::Decoded => "decoded",
            Stage::DetectedOutput => "detected-output",
            Stage::Encoded => "encoded",
            Stage::Written => "written",
        };
        f.write_str(name)
    }
}

/// Summary of a successful [`convert_file`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub input_format: Format,
    pub output_format: Format,
    pub output: PathBuf,
    pub bytes_written: usize,
}

/// Convert text between formats entirely in memory.
pub fn convert_str(text: &str, from: Format, to: Format) -> Result<String> {
    let value = from.decode(text)?;
    to.encode(&value)
}

/// Convert the file at `input` into `output`, choosing both formats from the
/// file extensions.
pub fn convert_file(input: &Path, output: &Path, options: &ConvertOptions) -> Result<Conversion> {
    tracing::debug!(stage = %Stage::Start, input = %input.display(), output = %output.display());

    let input_format = Format::detect(input)?;
    tracing::debug!(stage = %Stage::DetectedInput, format = %input_format);

    if options.check_output_first {
        Format::detect(output)?;
    }

    let text = read_input(input, input_format)?;
    let value = input_format.decode(&text)?;
    tracing::debug!(stage = %Stage::Decoded, kind = value.kind());

    let output_format = Format::detect(output)?;
    tracing::debug!(stage = %Stage::DetectedOutput, format = %output_format);

    let encoded = output_format.encode(&value)?;
    tracing::debug!(stage = %Stage::Encoded, bytes = encoded.len());

    fs::write(output, &encoded).map_err(|source| ConvertError::Io {
        path: output.to_path_buf(),
        source,
    })?;
    tracing::info!(
        stage = %Stage::Written,
        "Converted {} ({}) to {} ({})",
        input.display(),
        input_format,
        output.display(),
        output_format
    );

    Ok(Conversion {
        input_format,
        output_format,
        output: output.to_path_buf(),
        bytes_written: encoded.len(),
    })
}

fn read_input(path: &Path, format: Format) -> Result<String> {
    if !path.is_file() {
        return Err(ConvertError::FileNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ConvertError::FileNotFound(path.to_path_buf()),
        _ => ConvertError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    String::from_utf8(bytes)
        .map_err(|e| ConvertError::parse(format, format!("input is not valid UTF-8: {e}")))
}
