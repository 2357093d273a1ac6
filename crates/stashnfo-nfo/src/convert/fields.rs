//! Field extraction and value coercion shared by the record mappers.
//!
//! Stash data reaches us in two shapes: the JSON export (plain strings,
//! `rating` on a 1-5 scale) and the GraphQL API (`{ name }` objects,
//! `rating100`). These helpers accept both.

use chrono::{Datelike, NaiveDate};
use serde_json::{Map, Value};
use stashnfo_common::{Error, Result};
use tracing::warn;

use crate::detect::primary_file;

/// Upper bound of the NFO rating scale.
pub const MAX_RATING: f64 = 10.0;

/// Date layouts accepted on input, tried in order.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%m-%d-%Y"];

/// Non-empty text for `key`; numbers are rendered as text.
pub(crate) fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
    value_text(object.get(key)?)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Name carried by a plain string or a `{ "name": ... }` object.
pub(crate) fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::Object(object) => text(object, "name"),
        other => value_text(other),
    }
}

/// Names of every entry of the list at `key`, skipping blanks.
pub(crate) fn names(object: &Map<String, Value>, key: &str) -> Vec<String> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(name_of).collect())
        .unwrap_or_default()
}

/// Numeric value at `key`. Numeric strings are coerced; anything else that
/// is not null is malformed.
pub(crate) fn number(object: &Map<String, Value>, key: &str) -> Result<Option<f64>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| Error::malformed(key, format!("expected a number, got {s:?}"))),
        Some(other) => Err(Error::malformed(key, format!("expected a number, got {other}"))),
    }
}

/// Rating rescaled to the 0-10 NFO scale.
///
/// `rating` is on the 1-5 scale and doubled; `rating100` is divided by ten.
/// `rating` wins when both are present. Results outside 0-10 are clamped.
pub fn rescale_rating(object: &Map<String, Value>) -> Result<Option<f64>> {
    let (field, scaled) = if let Some(stars) = number(object, "rating")? {
        ("rating", stars * 2.0)
    } else if let Some(percent) = number(object, "rating100")? {
        ("rating100", percent / 10.0)
    } else {
        return Ok(None);
    };

    let clamped = scaled.clamp(0.0, MAX_RATING);
    if clamped != scaled {
        warn!(field, value = scaled, "Rating outside 0-10, clamped to {}", clamped);
    }
    // Normalises -0.0 so it never renders as "-0".
    Ok(Some(clamped + 0.0))
}

/// Render a number the way NFO readers expect: `8` rather than `8.0`.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Runtime in whole minutes from a duration in seconds.
///
/// The duration is read from the top level first, then from the file
/// object. A zero duration yields `None`.
pub fn runtime_minutes(object: &Map<String, Value>) -> Result<Option<u64>> {
    let seconds = match number(object, "duration")? {
        Some(seconds) => Some(seconds),
        None => match primary_file(object) {
            Some(file) => number(file, "duration")?,
            None => None,
        },
    };

    match seconds {
        Some(s) if s < 0.0 => Err(Error::malformed("duration", format!("negative duration {s}"))),
        Some(s) => Ok(Some((s / 60.0).floor() as u64).filter(|m| *m > 0)),
        None => Ok(None),
    }
}

/// Normalise a date to `YYYY-MM-DD` and extract its year.
///
/// Any time component is ignored. Strings in no known layout are returned
/// unchanged without a year.
pub fn normalize_date(raw: &str) -> (String, Option<i32>) {
    let raw = raw.trim();
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .map(|date| (date.format("%Y-%m-%d").to_string(), Some(date.year())))
        .unwrap_or_else(|| (raw.to_string(), None))
}

/// Source identifier: `id`, falling back to `url`.
pub(crate) fn unique_id(object: &Map<String, Value>) -> Option<String> {
    text(object, "id").or_else(|| text(object, "url"))
}

/// Path carried by a plain string or a `{ "path": ... }` object.
pub(crate) fn path_of(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Object(inner) => text(inner, "path"),
        other => value_text(other),
    }
}
