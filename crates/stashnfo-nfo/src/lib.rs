//! Stashnfo-NFO: turn Stash JSON records into NFO sidecar documents.
//!
//! The crate is three pure stages plus the artwork side effect:
//!
//! - [`detect`] / [`parse`]: load JSON and work out the [`RecordKind`]
//! - [`convert`]: map the record onto an [`NfoRecord`]
//! - [`generate`]: serialize the record as XML
//!
//! # Example
//!
//! ```
//! use stashnfo_nfo::{convert, generate, parse_str, ConvertOptions, GenerateOptions};
//!
//! let parsed = parse_str(r#"{"title": "Demo", "duration": 5400, "rating": 4}"#, None).unwrap();
//! let conversion = convert(parsed.kind, &parsed.record, &ConvertOptions::default()).unwrap();
//! let xml = generate(parsed.kind, &conversion.record, GenerateOptions::compact()).unwrap();
//!
//! let xml = String::from_utf8(xml).unwrap();
//! assert!(xml.contains("<runtime>90</runtime>"));
//! assert!(xml.contains("<rating>8</rating>"));
//! ```

pub mod convert;
pub mod detect;
pub mod generate;
pub mod images;
pub mod model;
pub mod parse;

pub use convert::{convert, Conversion, ConversionWarning, ConvertOptions};
pub use detect::{detect_type, resolve_kind};
pub use generate::{generate, root_element, GenerateOptions, XML_DECLARATION};
pub use images::ImageTarget;
pub use model::{NfoEntry, NfoRecord, NfoValue};
pub use parse::{parse_file, parse_str, parse_value, ParsedRecord};
pub use stashnfo_common::RecordKind;
