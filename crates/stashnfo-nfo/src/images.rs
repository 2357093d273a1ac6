//! Base64 artwork extraction.
//!
//! Stash JSON exports embed cover art as base64 strings. When extraction is
//! enabled the payload is decoded and written next to the NFO as
//! `{stem}-{aspect}.{ext}`, following the Kodi artwork naming scheme.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use stashnfo_common::{Error, Result};
use tracing::{debug, warn};

/// Source fields that may carry artwork, in the order they are examined.
pub const IMAGE_FIELDS: [&str; 5] = ["cover", "poster", "thumbnail", "fanart", "image"];

/// Kodi artwork slot an image is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageAspect {
    Poster,
    Thumb,
    Fanart,
}

impl ImageAspect {
    /// Slot for a Stash image field name.
    pub fn for_field(field: &str) -> Option<Self> {
        match field {
            "cover" | "poster" => Some(Self::Poster),
            "thumbnail" | "image" => Some(Self::Thumb),
            "fanart" => Some(Self::Fanart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Thumb => "thumb",
            Self::Fanart => "fanart",
        }
    }
}

/// How an image field value should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// A remote reference, copied into the NFO as-is.
    Url(&'a str),
    /// An embedded base64 payload, optionally wrapped in a `data:` URI.
    Payload(&'a str),
}

impl<'a> ImageSource<'a> {
    pub fn classify(value: &'a str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed)
        } else {
            Self::Payload(trimmed)
        }
    }
}

/// Decode a base64 payload, accepting `data:image/...;base64,` prefixes and
/// line-wrapped input.
pub fn decode_payload(payload: &str) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::engine::general_purpose::STANDARD.decode(compact)
}

/// File extension for decoded image bytes; `jpg` when the format is unknown.
pub fn extension_for(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("jpg")
}

/// Where extracted images are written: a directory and the NFO file stem.
///
/// Existing files are left alone unless `overwrite` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTarget {
    pub dir: PathBuf,
    pub stem: String,
    pub overwrite: bool,
}

impl ImageTarget {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
            overwrite: false,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Target placing images next to `output`, sharing its file stem.
    pub fn for_output(output: &Path) -> Self {
        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "nfo".to_string());
        Self::new(dir, stem)
    }

    /// File name an image for `aspect` with extension `ext` gets.
    pub fn file_name(&self, aspect: ImageAspect, ext: &str) -> String {
        format!("{}-{}.{}", self.stem, aspect.as_str(), ext)
    }

    /// Path an image named `name` is written to.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Write decoded image bytes and return the bare file name.
    ///
    /// # Errors
    ///
    /// [`Error::OutputExists`] when the file is already there and overwriting
    /// is off; [`Error::Output`] for any other write failure.
    pub fn write(&self, aspect: ImageAspect, bytes: &[u8]) -> Result<String> {
        let name = self.file_name(aspect, extension_for(bytes));
        let path = self.path_for(&name);

        let mut options = OpenOptions::new();
        options.write(true);
        if self.overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let mut file = options.open(&path).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => Error::OutputExists(path.clone()),
            _ => Error::output(&path, e),
        })?;
        file.write_all(bytes).map_err(|e| Error::output(&path, e))?;
        debug!("Wrote {} byte {} image to {}", bytes.len(), aspect.as_str(), path.display());
        Ok(name)
    }
}

/// Remove image files written by a run that did not complete.
pub fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => debug!("Removed {}", path.display()),
            Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
        }
    }
}
