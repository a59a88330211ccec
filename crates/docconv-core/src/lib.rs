//! # docconv-core
//!
//! Convert structured documents between **JSON**, **YAML** and **XML**.
//!
//! Every conversion parses the input into one canonical [`Value`] tree and
//! re-emits that tree in the target format. JSON and YAML map onto the tree
//! almost losslessly; XML does not, and its adapter documents exactly what is
//! lost (attributes, repeated sibling tags, list content).
//!
//! ## Quick start
//!
//! ```rust
//! use docconv_core::{convert_str, Format};
//!
//! let yaml = convert_str(r#"{"a": 1, "b": [2, 3]}"#, Format::Json, Format::Yaml).unwrap();
//! assert_eq!(yaml, "a: 1\nb:\n- 2\n- 3\n");
//!
//! let xml = convert_str(r#"{"root": {"x": "1"}}"#, Format::Json, Format::Xml).unwrap();
//! assert!(xml.contains("<x>1</x>"));
//! ```
//!
//! ## Modules
//!
//! - [`value`] — the canonical `Value` tree
//! - [`format`] — extension-based detection and dispatch
//! - [`json`], [`yaml`], [`xml`] — one decoder/encoder pair per format
//! - [`pipeline`] — file-to-file conversion (`convert_file`)
//! - [`error`] — error types

pub mod error;
pub mod format;
pub mod json;
pub mod pipeline;
pub mod value;
pub mod xml;
pub mod yaml;

pub use error::{ConvertError, Result};
pub use format::Format;
pub use pipeline::{convert_file, convert_str, Conversion, ConvertOptions, Stage};
pub use value::{Mapping, Scalar, Value};
