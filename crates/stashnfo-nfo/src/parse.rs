//! Loading Stash JSON documents.
//!
//! Files, in-memory strings and values fetched from the Stash API all go
//! through the same path: parse, then [`resolve_kind`]. The record itself is
//! never modified.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use stashnfo_common::{Error, RecordKind, Result};
use tracing::debug;

use crate::detect::resolve_kind;

/// A parsed source record together with its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub kind: RecordKind,
    pub record: Value,
}

/// Read and parse a JSON file.
///
/// # Errors
///
/// - [`Error::FileNotFound`] when `path` does not exist
/// - [`Error::Unreadable`] for any other I/O failure, including non-UTF-8 content
/// - [`Error::InvalidJson`] on syntax errors
/// - [`Error::TypeUndetermined`] when no override is given and detection fails
pub fn parse_file(path: &Path, kind_override: Option<RecordKind>) -> Result<ParsedRecord> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
        _ => Error::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    debug!("Read {} bytes from {}", content.len(), path.display());
    parse_document(&content, &path.display().to_string(), kind_override)
}

/// Parse a JSON document held in memory.
pub fn parse_str(content: &str, kind_override: Option<RecordKind>) -> Result<ParsedRecord> {
    parse_document(content, "<input>", kind_override)
}

/// Classify an already-parsed value, e.g. a record returned by the Stash API.
pub fn parse_value(record: Value, kind_override: Option<RecordKind>) -> Result<ParsedRecord> {
    let kind = resolve_kind(&record, kind_override)?;
    match kind_override {
        Some(_) => debug!(%kind, "Using explicit record type"),
        None => debug!(%kind, "Detected record type"),
    }
    Ok(ParsedRecord { kind, record })
}

fn parse_document(
    content: &str,
    origin: &str,
    kind_override: Option<RecordKind>,
) -> Result<ParsedRecord> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let record: Value = serde_json::from_str(content).map_err(|source| Error::InvalidJson {
        origin: origin.to_string(),
        source,
    })?;
    parse_value(record, kind_override)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn parse_file_detects_kind() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"name": "Alice", "gender": "female"}}"#).unwrap();

        let parsed = parse_file(file.path(), None).unwrap();
        assert_eq!(parsed.kind, RecordKind::Performer);
        assert_eq!(parsed.record["name"], "Alice");
    }

    #[test]
    fn parse_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = parse_file(&path, None).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(ref p) if p == &path));
    }

    #[test]
    fn parse_file_not_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x7b]).unwrap();
        let err = parse_file(file.path(), None).unwrap_err();
        assert!(matches!(err, Error::Unreadable { .. }));
    }

    #[test]
    fn parse_file_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_file(dir.path(), None).unwrap_err();
        assert!(matches!(err, Error::Unreadable { .. }));
    }

    #[test]
    fn invalid_json() {
        let err = parse_str(r#"{"title": "x",}"#, None).unwrap_err();
        assert!(matches!(err, Error::InvalidJson { ref origin, .. } if origin == "<input>"));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let parsed = parse_str("\u{feff}{\"folder\": \"/pics\"}", None).unwrap();
        assert_eq!(parsed.kind, RecordKind::Gallery);
    }

    #[test]
    fn record_is_returned_unmodified() {
        let record = json!({ "title": "Demo", "extra": { "nested": [1, 2, 3] } });
        let parsed = parse_value(record.clone(), None).unwrap();
        assert_eq!(parsed.record, record);
    }

    #[test]
    fn override_is_trusted() {
        let parsed = parse_str(r#"{"unrelated": true}"#, Some(RecordKind::Performer)).unwrap();
        assert_eq!(parsed.kind, RecordKind::Performer);
    }

    #[test]
    fn undetermined_without_override() {
        let err = parse_str(r#"{"unrelated": true}"#, None).unwrap_err();
        assert!(matches!(err, Error::TypeUndetermined));
    }
}
