//! Interactive mode: collect an input and an output path, then run the same
//! pipeline as the non-interactive path.
//!
//! A failed conversion is reported and the picker asks again, so the user can
//! correct a path without restarting. Cancelling ends the loop.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use docconv_core::{Conversion, ConvertError, ConvertOptions};

/// Where the two paths come from and where results are shown.
pub trait PathPicker {
    /// Ask for `(input, output)`. `None` means the user cancelled.
    fn pick_paths(&mut self) -> Result<Option<(PathBuf, PathBuf)>>;
    fn report_success(&mut self, conversion: &Conversion) -> Result<()>;
    fn report_error(&mut self, error: &ConvertError) -> Result<()>;
}

#[derive(Debug)]
pub enum Outcome {
    Converted(Conversion),
    Cancelled,
}

/// Drive `picker` until one conversion succeeds or the user cancels.
pub fn run<P: PathPicker>(picker: &mut P, options: &ConvertOptions) -> Result<Outcome> {
    loop {
        let Some((input, output)) = picker.pick_paths()? else {
            return Ok(Outcome::Cancelled);
        };
        match docconv_core::convert_file(&input, &output, options) {
            Ok(conversion) => {
                picker.report_success(&conversion)?;
                return Ok(Outcome::Converted(conversion));
            }
            Err(err) => picker.report_error(&err)?,
        }
    }
}

/// Line-based picker over any reader/writer pair (stdin/stdout in practice).
pub struct TerminalPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalPicker { input, output }
    }

    /// Print `label`, read one line. `None` on end of input or an empty answer.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        let answer = line.trim();
        if read == 0 || answer.is_empty() {
            return Ok(None);
        }
        Ok(Some(answer.to_string()))
    }
}

impl<R: BufRead, W: Write> PathPicker for TerminalPicker<R, W> {
    fn pick_paths(&mut self) -> Result<Option<(PathBuf, PathBuf)>> {
        loop {
            let Some(input) = self.prompt("Input file: ")? else {
                return Ok(None);
            };
            let Some(output) = self.prompt("Output file: ")? else {
                return Ok(None);
            };
            // An empty answer confirms.
            let mut line = String::new();
            write!(self.output, "Convert {input} -> {output}? [Y/n] ")?;
            self.output.flush()?;
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim() {
                "" | "y" | "Y" | "yes" => return Ok(Some((input.into(), output.into()))),
                _ => continue,
            }
        }
    }

    fn report_success(&mut self, conversion: &Conversion) -> Result<()> {
        writeln!(
            self.output,
            "Data has been written to {}",
            conversion.output.display()
        )?;
        Ok(())
    }

    fn report_error(&mut self, error: &ConvertError) -> Result<()> {
        writeln!(self.output, "Error: {error}")?;
        Ok(())
    }
}

/// Native file dialogs and message boxes.
#[cfg(feature = "dialogs")]
pub struct DialogPicker;

#[cfg(feature = "dialogs")]
const DOCUMENT_EXTENSIONS: &[&str] = &["json", "yml", "yaml", "xml"];

#[cfg(feature = "dialogs")]
impl PathPicker for DialogPicker {
    fn pick_paths(&mut self) -> Result<Option<(PathBuf, PathBuf)>> {
        let Some(input) = rfd::FileDialog::new()
            .set_title("Select input file")
            .add_filter("Documents", DOCUMENT_EXTENSIONS)
            .pick_file()
        else {
            return Ok(None);
        };
        let Some(output) = rfd::FileDialog::new()
            .set_title("Save converted file as")
            .add_filter("Documents", DOCUMENT_EXTENSIONS)
            .save_file()
        else {
            return Ok(None);
        };

        let result = rfd::MessageDialog::new()
            .set_title("Convert")
            .set_description(format!(
                "Convert {}\nto {}?",
                input.display(),
                output.display()
            ))
            .set_buttons(rfd::MessageButtons::OkCancelCustom(
                "Convert".to_string(),
                "Cancel".to_string(),
            ))
            .show();

        // OkCancelCustom returns Custom(button_text) for both buttons
        if matches!(result, rfd::MessageDialogResult::Custom(ref s) if s == "Convert") {
            Ok(Some((input, output)))
        } else {
            Ok(None)
        }
    }

    fn report_success(&mut self, conversion: &Conversion) -> Result<()> {
        rfd::MessageDialog::new()
            .set_title("Conversion complete")
            .set_description(format!(
                "Data has been written to {}",
                conversion.output.display()
            ))
            .set_level(rfd::MessageLevel::Info)
            .show();
        Ok(())
    }

    fn report_error(&mut self, error: &ConvertError) -> Result<()> {
        rfd::MessageDialog::new()
            .set_title("Conversion failed")
            .set_description(error.to_string())
            .set_level(rfd::MessageLevel::Error)
            .show();
        Ok(())
    }
}
