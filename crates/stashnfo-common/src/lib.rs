//! Stashnfo-Common: shared error taxonomy and record kinds.
//!
//! - **Record kinds**: [`RecordKind`] for scenes, performers and galleries
//! - **Error handling**: a single [`Error`] enum grouped into
//!   [`ErrorCategory`] values, plus a [`Result`] alias
//!
//! # Examples
//!
//! ```
//! use stashnfo_common::{Error, ErrorCategory, RecordKind, Result};
//!
//! let kind: RecordKind = "scene".parse().unwrap();
//! assert_eq!(kind, RecordKind::Scene);
//!
//! fn example() -> Result<()> {
//!     Err(Error::usage("no input given"))
//! }
//! assert_eq!(example().unwrap_err().category(), ErrorCategory::Usage);
//! ```

pub mod error;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use types::*;
