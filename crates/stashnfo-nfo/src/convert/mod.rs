//! Mapping Stash records onto the NFO schemas.
//!
//! [`convert`] dispatches on the record kind:
//!
//! - scene → movie record ([`scene`])
//! - performer → actor record ([`performer`])
//! - gallery → album record written with the movie schema ([`gallery`])
//!
//! Optional fields that are missing or empty are left out of the output.
//! Required fields (`title`, or `name` for performers) default to an empty
//! string.

mod fields;
mod gallery;
mod performer;
mod scene;

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde_json::{Map, Value};
use stashnfo_common::{Error, RecordKind, Result};
use tracing::{debug, warn};

use crate::images::{
    decode_payload, remove_written, ImageAspect, ImageSource, ImageTarget, IMAGE_FIELDS,
};
use crate::model::{NfoEntry, NfoRecord};

pub use fields::{format_number, normalize_date, rescale_rating, runtime_minutes, MAX_RATING};

/// Conversion settings.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Where embedded base64 artwork is written. `None` disables extraction.
    pub images: Option<ImageTarget>,
}

impl ConvertOptions {
    /// Options with image extraction into `target`.
    pub fn with_images(target: ImageTarget) -> Self {
        Self {
            images: Some(target),
        }
    }
}

/// A non-fatal problem found while converting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// An embedded image could not be decoded and was dropped.
    ImageDecode { field: String, reason: String },
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageDecode { field, reason } => {
                write!(f, "Skipped image field '{field}': {reason}")
            }
        }
    }
}

/// Result of a conversion: the record plus any warnings raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub record: NfoRecord,
    pub warnings: Vec<ConversionWarning>,
    /// Image files written while converting.
    pub images: Vec<PathBuf>,
}

/// Convert a Stash record of the given kind into a normalized NFO record.
///
/// When `options.images` is set, embedded artwork is written to disk as a
/// side effect and referenced by file name.
///
/// # Errors
///
/// - [`Error::MalformedField`] when the record is not an object or a field
///   cannot be coerced
/// - [`Error::Output`] or [`Error::OutputExists`] when extracted artwork
///   cannot be written
///
/// Artwork already written by a failed conversion is removed again.
pub fn convert(kind: RecordKind, record: &Value, options: &ConvertOptions) -> Result<Conversion> {
    let source = record
        .as_object()
        .ok_or_else(|| Error::malformed("record", "expected a JSON object"))?;

    let mut ctx = MappingContext {
        source,
        options,
        warnings: Vec::new(),
        images: Vec::new(),
    };

    let mapped = match kind {
        RecordKind::Scene => scene::convert(&mut ctx),
        RecordKind::Performer => performer::convert(&mut ctx),
        RecordKind::Gallery => gallery::convert(&mut ctx),
    };
    let record = match mapped {
        Ok(record) => record,
        Err(e) => {
            remove_written(&ctx.images);
            return Err(e);
        }
    };

    debug!(%kind, entries = record.len(), warnings = ctx.warnings.len(), "Converted record");
    Ok(Conversion {
        record,
        warnings: ctx.warnings,
        images: ctx.images,
    })
}

/// State shared by the per-kind mappers.
struct MappingContext<'a> {
    source: &'a Map<String, Value>,
    options: &'a ConvertOptions,
    warnings: Vec<ConversionWarning>,
    images: Vec<PathBuf>,
}

impl MappingContext<'_> {
    fn text(&self, key: &str) -> Option<String> {
        fields::text(self.source, key)
    }

    /// `title` and `originaltitle`; the title is required.
    fn push_titles(&self, record: &mut NfoRecord) {
        let title = self.text("title");
        record.push_text("title", title.clone().unwrap_or_default());
        record.push_opt("originaltitle", title);
    }

    fn push_rating(&self, record: &mut NfoRecord) -> Result<()> {
        if let Some(rating) = fields::rescale_rating(self.source)? {
            record.push_text("rating", format_number(rating));
        }
        Ok(())
    }

    /// `premiered` and `year` from the `date` field.
    fn push_release_date(&self, record: &mut NfoRecord) {
        if let Some(raw) = self.text("date") {
            let (date, year) = fields::normalize_date(&raw);
            record.push_text("premiered", date);
            if let Some(year) = year {
                record.push_text("year", year.to_string());
            }
        }
    }

    fn push_studio(&self, record: &mut NfoRecord) {
        record.push_opt("studio", self.source.get("studio").and_then(fields::name_of));
    }

    fn push_unique_id(&self, record: &mut NfoRecord) {
        if let Some(id) = fields::unique_id(self.source) {
            record.push(
                NfoEntry::text("uniqueid", id)
                    .with_attribute("type", "stash")
                    .with_attribute("default", "true"),
            );
        }
    }

    /// One `genre` and one `tag` element per tag name.
    fn push_tags(&self, record: &mut NfoRecord) {
        let tags = fields::names(self.source, "tags");
        for tag in &tags {
            record.push_text("genre", tag.as_str());
        }
        for tag in tags {
            record.push_text("tag", tag);
        }
    }

    /// One `actor` element per performer, in source order.
    fn push_actors(&self, record: &mut NfoRecord) {
        let Some(performers) = self.source.get("performers").and_then(Value::as_array) else {
            return;
        };

        let actors = performers.iter().filter_map(|performer| {
            let name = fields::name_of(performer)?;
            let details = performer.as_object();
            let role = details.and_then(|p| fields::text(p, "role"));
            let thumb = details.and_then(|p| {
                fields::text(p, "image_path").or_else(|| fields::text(p, "thumbnail"))
            });
            Some((name, role, thumb))
        });

        for (order, (name, role, thumb)) in actors.enumerate() {
            let mut children = vec![NfoEntry::text("name", name)];
            if let Some(role) = role {
                children.push(NfoEntry::text("role", role));
            }
            children.push(NfoEntry::text("order", order.to_string()));
            if let Some(thumb) = thumb {
                children.push(NfoEntry::text("thumb", thumb));
            }
            record.push(NfoEntry::nested("actor", children));
        }
    }

    /// Artwork references. URLs are kept; base64 payloads are extracted when
    /// enabled and dropped otherwise.
    fn push_images(&mut self, record: &mut NfoRecord) -> Result<()> {
        let mut written = HashSet::new();

        for field in IMAGE_FIELDS {
            let Some(value) = self.text(field) else {
                continue;
            };
            let Some(aspect) = ImageAspect::for_field(field) else {
                continue;
            };
            if written.contains(&aspect) {
                debug!(field, "Image slot '{}' already filled", aspect.as_str());
                continue;
            }

            let reference = match ImageSource::classify(&value) {
                ImageSource::Url(url) => url.to_string(),
                ImageSource::Payload(payload) => {
                    let Some(target) = &self.options.images else {
                        debug!(field, "Image extraction disabled, omitting embedded image");
                        continue;
                    };
                    match decode_payload(payload) {
                        Ok(bytes) => {
                            let name = target.write(aspect, &bytes)?;
                            self.images.push(target.path_for(&name));
                            name
                        }
                        Err(e) => {
                            warn!(field, "Failed to decode embedded image: {}", e);
                            self.warnings.push(ConversionWarning::ImageDecode {
                                field: field.to_string(),
                                reason: e.to_string(),
                            });
                            continue;
                        }
                    }
                }
            };

            written.insert(aspect);
            record.push(image_entry(aspect, reference));
        }

        Ok(())
    }
}

fn image_entry(aspect: ImageAspect, reference: String) -> NfoEntry {
    match aspect {
        ImageAspect::Fanart => NfoEntry::nested("fanart", vec![NfoEntry::text("thumb", reference)]),
        ImageAspect::Poster | ImageAspect::Thumb => {
            NfoEntry::text("thumb", reference).with_attribute("aspect", aspect.as_str())
        }
    }
}
