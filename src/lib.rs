//! Stashnfo - convert Stash metadata into NFO sidecar files
//!
//! This library crate exposes the runner behind the CLI for integration
//! testing. The conversion itself lives in `stashnfo-nfo`.

pub mod config;
pub mod processor;
pub mod stash;
