//! Core type definitions shared by the parser, converter and generator.
//!
//! Record kinds serialize in lowercase, matching the values accepted on the
//! command line and in configuration files.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// Kind of Stash record being converted.
///
/// The kind is never stored on the source JSON; it is inferred from which
/// fields are present or supplied explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// A video scene, written as a movie NFO.
    Scene,
    /// A performer profile, written as an actor NFO.
    Performer,
    /// An image gallery, written with the movie NFO schema.
    Gallery,
}

impl RecordKind {
    /// All record kinds, in detection priority order.
    pub const ALL: [RecordKind; 3] = [Self::Scene, Self::Performer, Self::Gallery];

    /// Lowercase name used in file names and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Performer => "performer",
            Self::Gallery => "gallery",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scene" => Ok(Self::Scene),
            "performer" => Ok(Self::Performer),
            "gallery" => Ok(Self::Gallery),
            _ => Err(Error::unsupported_kind(s)),
        }
    }
}
