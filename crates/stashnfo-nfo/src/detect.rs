//! Record kind detection from the key set of a Stash JSON object.

use serde_json::{Map, Value};
use stashnfo_common::{Error, RecordKind, Result};

/// Fields that mark a plain metadata export as a scene when nothing more
/// specific matched.
const SCENE_FALLBACK_FIELDS: [&str; 4] = ["title", "studio", "tags", "performers"];

/// Infer the kind of a Stash record.
///
/// Rules are checked in priority order and the first match wins:
///
/// 1. a `file` object (or a `files` array of objects) together with a
///    `duration`, at top level or inside that file → scene
/// 2. `gender` or `birthdate` → performer
/// 3. `folder`, or a `scenes` list → gallery
/// 4. any of `title`, `studio`, `tags`, `performers` → scene
///
/// # Errors
///
/// [`Error::TypeUndetermined`] when `record` is not an object or no rule
/// matches.
pub fn detect_type(record: &Value) -> Result<RecordKind> {
    let Some(object) = record.as_object() else {
        return Err(Error::TypeUndetermined);
    };

    if let Some(file) = primary_file(object) {
        if object.contains_key("duration") || file.contains_key("duration") {
            return Ok(RecordKind::Scene);
        }
    }

    if object.contains_key("gender") || object.contains_key("birthdate") {
        return Ok(RecordKind::Performer);
    }

    if object.contains_key("folder") || object.get("scenes").is_some_and(Value::is_array) {
        return Ok(RecordKind::Gallery);
    }

    if SCENE_FALLBACK_FIELDS
        .iter()
        .any(|field| object.contains_key(*field))
    {
        return Ok(RecordKind::Scene);
    }

    Err(Error::TypeUndetermined)
}

/// Use `kind_override` when given, otherwise detect.
///
/// An override is trusted as-is: the record is not inspected at all.
pub fn resolve_kind(record: &Value, kind_override: Option<RecordKind>) -> Result<RecordKind> {
    match kind_override {
        Some(kind) => Ok(kind),
        None => detect_type(record),
    }
}

/// The `file` object of an export, or the first entry of the API's `files`.
pub(crate) fn primary_file(object: &Map<String, Value>) -> Option<&Map<String, Value>> {
    if let Some(file) = object.get("file").and_then(Value::as_object) {
        return Some(file);
    }
    object
        .get("files")
        .and_then(Value::as_array)
        .and_then(|files| files.first())
        .and_then(Value::as_object)
}
