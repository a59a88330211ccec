//! `docconv` CLI — convert a document between JSON, YAML and XML.
//!
//! ## Usage
//!
//! ```sh
//! # Convert one file; both formats come from the extensions
//! docconv data.json data.yaml
//! docconv config.yml config.xml
//!
//! # Reject a bad output extension before reading the input
//! docconv --check-output-first data.json data.txt
//!
//! # No paths: pick input and output interactively
//! docconv
//! ```
//!
//! Exits 0 on success and 1 on any conversion failure. The error is printed
//! to stdout; logs go to stderr (`-v` or `RUST_LOG` to see more).

mod picker;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use docconv_core::ConvertOptions;
use tracing_subscriber::EnvFilter;

use picker::Outcome;

#[derive(Parser)]
#[command(
    name = "docconv",
    version,
    about = "Convert documents between JSON, YAML and XML"
)]
struct Cli {
    /// Input file (.json, .yml, .yaml or .xml); omit both paths for interactive mode
    #[arg(requires = "output")]
    input: Option<PathBuf>,

    /// Output file; its extension selects the target format
    output: Option<PathBuf>,

    /// Check the output extension before reading the input
    #[arg(long)]
    check_output_first: bool,

    /// Log every pipeline stage to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ConvertOptions {
        check_output_first: cli.check_output_first,
    };

    match (cli.input, cli.output) {
        (Some(input), Some(output)) => run_once(&input, &output, &options),
        _ => run_interactive(&options),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_once(input: &Path, output: &Path, options: &ConvertOptions) -> ExitCode {
    match docconv_core::convert_file(input, output, options) {
        Ok(conversion) => {
            println!("Data has been written to {}", conversion.output.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_interactive(options: &ConvertOptions) -> ExitCode {
    #[cfg(feature = "dialogs")]
    let mut picker = picker::DialogPicker;
    #[cfg(not(feature = "dialogs"))]
    let mut picker = picker::TerminalPicker::new(std::io::stdin().lock(), std::io::stdout());

    match picker::run(&mut picker, options) {
        Ok(Outcome::Converted(conversion)) => {
            tracing::debug!(bytes = conversion.bytes_written, "interactive conversion finished");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Cancelled) => {
            println!("Conversion cancelled");
            ExitCode::FAILURE
        }
        Err(err) => {
            println!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
