//! One conversion run: pick the source, load the record, convert it and
//! write the NFO file.

use crate::config::Config;
use crate::stash::StashClient;
use anyhow::{Context, Result};
use serde_json::Value;
use stashnfo_common::{Error, RecordKind};
use stashnfo_nfo::images::remove_written;
use stashnfo_nfo::{
    convert, generate, parse_file, parse_value, ConversionWarning, ConvertOptions,
    GenerateOptions, ImageTarget, ParsedRecord,
};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where the record comes from. Exactly one source per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    StashId(u64),
    Search(String),
}

impl Source {
    /// Pick the single source among the given options.
    pub fn select(
        input: Option<PathBuf>,
        stash_id: Option<u64>,
        search: Option<String>,
    ) -> stashnfo_common::Result<Self> {
        match (input, stash_id, search) {
            (Some(path), None, None) => Ok(Self::File(path)),
            (None, Some(id), None) => Ok(Self::StashId(id)),
            (None, None, Some(text)) => Ok(Self::Search(text)),
            (None, None, None) => Err(Error::usage(
                "no input given: pass an INPUT file, --stash-id or --search",
            )),
            _ => Err(Error::usage(
                "INPUT, --stash-id and --search are mutually exclusive",
            )),
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::File(_))
    }
}

/// A single conversion request.
#[derive(Debug, Clone)]
pub struct Job {
    pub source: Source,
    pub output: Option<PathBuf>,
    pub kind_override: Option<RecordKind>,
    pub pretty: bool,
    pub extract_images: bool,
    pub overwrite: bool,
}

impl Job {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            output: None,
            kind_override: None,
            pretty: false,
            extract_images: false,
            overwrite: false,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct Report {
    pub kind: RecordKind,
    pub output: PathBuf,
    pub warnings: Vec<ConversionWarning>,
    pub bytes: usize,
}

/// Run `job`. Output flags set in `config` apply in addition to the job's.
pub fn run(job: &Job, config: &Config) -> Result<Report> {
    let pretty = job.pretty || config.output.pretty;
    let extract_images = job.extract_images || config.output.extract_images;
    let overwrite = job.overwrite || config.output.overwrite;

    let parsed = load(job, config)?;
    let output = job
        .output
        .clone()
        .unwrap_or_else(|| default_output(&job.source, &parsed));

    if output.exists() && !overwrite {
        return Err(Error::OutputExists(output).into());
    }

    let options = if extract_images {
        ConvertOptions::with_images(ImageTarget::for_output(&output).with_overwrite(overwrite))
    } else {
        ConvertOptions::default()
    };
    let conversion = convert(parsed.kind, &parsed.record, &options)?;

    let written = generate(parsed.kind, &conversion.record, GenerateOptions { pretty })
        .and_then(|xml| write_atomic(&output, &xml, overwrite).map(|_| xml));
    let xml = match written {
        Ok(xml) => xml,
        Err(e) => {
            // Artwork without its NFO is not kept.
            remove_written(&conversion.images);
            return Err(e.into());
        }
    };
    tracing::info!("Wrote {} ({} bytes)", output.display(), xml.len());

    Ok(Report {
        kind: parsed.kind,
        output,
        warnings: conversion.warnings,
        bytes: xml.len(),
    })
}

fn load(job: &Job, config: &Config) -> Result<ParsedRecord> {
    let text_or_id = match &job.source {
        Source::File(path) => {
            tracing::info!("Reading {}", path.display());
            return Ok(parse_file(path, job.kind_override)?);
        }
        Source::StashId(id) => id.to_string(),
        Source::Search(text) => text.clone(),
    };

    // Remote records carry no shape hints worth detecting; default to scenes.
    let kind = job.kind_override.unwrap_or(RecordKind::Scene);
    let client = StashClient::new(&config.stash);
    tracing::info!("Querying {} for {} '{}'", client.endpoint(), kind, text_or_id);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let record = rt.block_on(async {
        let version = client.test_connection().await?;
        tracing::debug!("Connected to Stash {}", version);

        match &job.source {
            Source::Search(text) => {
                let mut matches = client.search(kind, text).await?;
                tracing::info!("{} {} records match '{}', using the first", matches.len(), kind, text);
                Ok::<Value, Error>(matches.swap_remove(0))
            }
            _ => client.fetch_by_id(kind, &text_or_id).await,
        }
    })?;

    Ok(parse_value(record, Some(kind))?)
}

/// NFO path used when none is given: the input with an `.nfo` extension,
/// or `{kind}-{id}.nfo` in the working directory for remote records.
pub fn default_output(source: &Source, parsed: &ParsedRecord) -> PathBuf {
    match source {
        Source::File(path) => path.with_extension("nfo"),
        Source::StashId(id) => PathBuf::from(format!("{}-{}.nfo", parsed.kind, id)),
        Source::Search(_) => {
            let id = match parsed.record.get("id") {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => "search".to_string(),
            };
            PathBuf::from(format!("{}-{}.nfo", parsed.kind, id))
        }
    }
}

/// Write through a temporary file in the destination directory so a failed
/// run never leaves a truncated NFO behind.
fn write_atomic(path: &Path, contents: &[u8], overwrite: bool) -> stashnfo_common::Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::output(path, e))?;
    file.write_all(contents)
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| Error::output(path, e))?;

    let persisted = if overwrite {
        file.persist(path)
    } else {
        file.persist_noclobber(path)
    };
    persisted.map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            Error::OutputExists(path.to_path_buf())
        } else {
            Error::output(path, e.error)
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    const DEMO: &str = r#"{"title": "Demo", "details": "A tale", "duration": 5400, "rating": 4}"#;

    fn error_of(err: &anyhow::Error) -> &Error {
        err.downcast_ref::<Error>().unwrap()
    }

    #[test]
    fn select_exactly_one_source() {
        assert_eq!(
            Source::select(Some("a.json".into()), None, None).unwrap(),
            Source::File("a.json".into())
        );
        assert_eq!(
            Source::select(None, Some(12), None).unwrap(),
            Source::StashId(12)
        );
        assert!(Source::select(None, None, Some("x".into())).unwrap().is_remote());

        assert_matches!(Source::select(None, None, None), Err(Error::Usage(_)));
        assert_matches!(
            Source::select(Some("a.json".into()), Some(1), None),
            Err(Error::Usage(_))
        );
    }

    #[test]
    fn default_output_paths() {
        let parsed = ParsedRecord {
            kind: RecordKind::Performer,
            record: json!({ "id": 7, "name": "A" }),
        };
        assert_eq!(
            default_output(&Source::File("dir/alice.json".into()), &parsed),
            PathBuf::from("dir/alice.nfo")
        );
        assert_eq!(
            default_output(&Source::StashId(12), &parsed),
            PathBuf::from("performer-12.nfo")
        );
        assert_eq!(
            default_output(&Source::Search("alice".into()), &parsed),
            PathBuf::from("performer-7.nfo")
        );
    }

    #[test]
    fn converts_file_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demo.json");
        std::fs::write(&input, DEMO).unwrap();

        let report = run(&Job::new(Source::File(input)), &Config::default()).unwrap();
        assert_eq!(report.kind, RecordKind::Scene);
        assert_eq!(report.output, dir.path().join("demo.nfo"));
        assert!(report.warnings.is_empty());

        let xml = std::fs::read_to_string(&report.output).unwrap();
        assert_eq!(xml.len(), report.bytes);
        assert!(xml.contains("<runtime>90</runtime>"));
        assert!(xml.contains("<rating>8</rating>"));
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demo.json");
        let output = dir.path().join("demo.nfo");
        std::fs::write(&input, DEMO).unwrap();
        std::fs::write(&output, "keep me").unwrap();

        let job = Job::new(Source::File(input.clone()));
        let err = run(&job, &Config::default()).unwrap_err();
        assert_matches!(error_of(&err), Error::OutputExists(p) if *p == output);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me");

        let job = Job {
            overwrite: true,
            ..Job::new(Source::File(input))
        };
        run(&job, &Config::default()).unwrap();
        assert!(std::fs::read_to_string(&output).unwrap().contains("<title>Demo</title>"));
    }

    #[test]
    fn config_output_defaults_apply() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demo.json");
        std::fs::write(&input, DEMO).unwrap();

        let mut config = Config::default();
        config.output.pretty = true;
        let report = run(&Job::new(Source::File(input)), &config).unwrap();

        let xml = std::fs::read_to_string(report.output).unwrap();
        assert!(xml.contains("\n  <title>Demo</title>\n"));
    }

    #[test]
    fn failed_conversion_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.json");
        std::fs::write(&input, r#"{"title": "T", "rating": "great"}"#).unwrap();

        let err = run(&Job::new(Source::File(input)), &Config::default()).unwrap_err();
        assert_matches!(error_of(&err), Error::MalformedField { .. });
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("bad.json")]);
    }

    #[test]
    fn unwritable_destination_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("demo.json");
        std::fs::write(&input, DEMO).unwrap();

        let job = Job {
            output: Some(dir.path().join("missing/dir/demo.nfo")),
            ..Job::new(Source::File(input))
        };
        let err = run(&job, &Config::default()).unwrap_err();
        assert_eq!(error_of(&err).category(), stashnfo_common::ErrorCategory::Output);
    }

    const COVERED: &str = r#"{"title": "Covered", "cover": "data:image/png;base64,iVBORw0KGgoAAAAA"}"#;

    #[test]
    fn existing_artwork_is_kept_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("c.json");
        let art = dir.path().join("c-poster.png");
        std::fs::write(&input, COVERED).unwrap();
        std::fs::write(&art, "USER ART").unwrap();

        let job = Job {
            extract_images: true,
            ..Job::new(Source::File(input.clone()))
        };
        let err = run(&job, &Config::default()).unwrap_err();
        assert_matches!(error_of(&err), Error::OutputExists(p) if *p == art);
        assert_eq!(std::fs::read_to_string(&art).unwrap(), "USER ART");
        assert!(!dir.path().join("c.nfo").exists());

        let job = Job {
            extract_images: true,
            overwrite: true,
            ..Job::new(Source::File(input))
        };
        run(&job, &Config::default()).unwrap();
        assert_ne!(std::fs::read(&art).unwrap(), b"USER ART");
        assert!(dir.path().join("c.nfo").exists());
    }

    #[test]
    fn failed_write_removes_extracted_artwork() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("c.json");
        std::fs::write(&input, COVERED).unwrap();
        // A directory in place of the NFO makes the final rename fail.
        let output = dir.path().join("c.nfo");
        std::fs::create_dir(&output).unwrap();

        let job = Job {
            extract_images: true,
            overwrite: true,
            ..Job::new(Source::File(input))
        };
        let err = run(&job, &Config::default()).unwrap_err();
        assert_eq!(error_of(&err).category(), stashnfo_common::ErrorCategory::Output);
        assert!(!dir.path().join("c-poster.png").exists());
        assert!(output.is_dir());
    }

    #[test]
    fn missing_input_is_input_error() {
        let job = Job::new(Source::File("/nonexistent/scene.json".into()));
        let err = run(&job, &Config::default()).unwrap_err();
        assert_matches!(error_of(&err), Error::FileNotFound(_));
    }
}
