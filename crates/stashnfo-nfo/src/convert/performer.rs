//! Performer → actor record.

use serde_json::{Map, Value};
use stashnfo_common::Result;

use super::{fields, MappingContext};
use crate::model::NfoRecord;

/// Physical and career attributes, in output order: (source keys, tag, label).
const ATTRIBUTES: [(&[&str], &str, &str); 9] = [
    (&["gender"], "gender", "Gender"),
    (&["ethnicity"], "ethnicity", "Ethnicity"),
    (&["country"], "country", "Country"),
    (&["height", "height_cm"], "height", "Height"),
    (&["measurements"], "measurements", "Measurements"),
    (&["eye_color"], "eye_color", "Eye Color"),
    (&["career_length"], "career_length", "Career Length"),
    (&["tattoos"], "tattoos", "Tattoos"),
    (&["piercings"], "piercings", "Piercings"),
];

const SOCIAL: [&str; 3] = ["url", "twitter", "instagram"];

pub(super) fn convert(ctx: &mut MappingContext<'_>) -> Result<NfoRecord> {
    let mut record = NfoRecord::new();

    let attributes: Vec<(&str, &str, String)> = ATTRIBUTES
        .iter()
        .filter_map(|(keys, tag, label)| {
            let value = keys.iter().find_map(|key| ctx.text(key))?;
            Some((*tag, *label, value))
        })
        .collect();
    let aliases = aliases(ctx.source);

    record.push_text("name", ctx.text("name").unwrap_or_default());
    record.push_opt(
        "biography",
        Some(biography(ctx.text("details"), &attributes, &aliases)),
    );
    if let Some(raw) = ctx.text("birthdate") {
        record.push_text("birthdate", fields::normalize_date(&raw).0);
    }
    for (tag, _, value) in &attributes {
        record.push_text(tag, value.as_str());
    }
    for alias in aliases {
        record.push_text("alias", alias);
    }
    for key in SOCIAL {
        record.push_opt(key, ctx.text(key));
    }
    ctx.push_unique_id(&mut record);
    ctx.push_images(&mut record)?;

    Ok(record)
}

/// Aliases from a list, a comma-separated string, or the API's `alias_list`.
/// Duplicates are dropped; first occurrence wins.
fn aliases(source: &Map<String, Value>) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for key in ["aliases", "alias_list"] {
        let candidates: Vec<String> = match source.get(key) {
            Some(Value::String(joined)) => joined.split(',').map(str::to_string).collect(),
            Some(Value::Array(_)) => fields::names(source, key),
            _ => continue,
        };
        for alias in candidates {
            let alias = alias.trim();
            if !alias.is_empty() && !found.iter().any(|a| a == alias) {
                found.push(alias.to_string());
            }
        }
    }

    found
}

/// Free-text details followed by one `Label: value` line per attribute.
fn biography(details: Option<String>, attributes: &[(&str, &str, String)], aliases: &[String]) -> String {
    let mut lines: Vec<String> = attributes
        .iter()
        .map(|(_, label, value)| format!("{label}: {value}"))
        .collect();
    if !aliases.is_empty() {
        lines.push(format!("Aliases: {}", aliases.join(", ")));
    }

    match details {
        Some(details) if lines.is_empty() => details,
        Some(details) => format!("{details}\n\n{}", lines.join("\n")),
        None => lines.join("\n"),
    }
}
