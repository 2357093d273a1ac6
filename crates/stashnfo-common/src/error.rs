//! Common error types used throughout stashnfo.
//!
//! Every failure belongs to one [`ErrorCategory`]; the CLI maps categories to
//! exit codes. Image decoding problems are not errors at all: the converter
//! reports them as warnings and carries on.

use std::path::PathBuf;

/// Broad grouping of [`Error`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad or missing command-line arguments.
    Usage,
    /// The input document could not be read, parsed or classified.
    Input,
    /// A record could not be mapped to the NFO schema.
    Conversion,
    /// The remote Stash server could not be reached or answered badly.
    Network,
    /// The destination could not be written.
    Output,
}

/// Common error type for stashnfo.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid combination of arguments.
    #[error("Usage error: {0}")]
    Usage(String),

    /// The input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The input file exists but could not be read as UTF-8 text.
    #[error("Input file not readable: {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid JSON.
    #[error("Invalid JSON in {origin}: {source}")]
    InvalidJson {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// None of the detection rules matched the record.
    #[error("Record type undetermined: no scene, performer or gallery fields found")]
    TypeUndetermined,

    /// A kind outside scene, performer and gallery was requested.
    #[error("Unsupported kind: {0}")]
    UnsupportedKind(String),

    /// A field is present but cannot be coerced to the expected type.
    #[error("Malformed field '{field}': {reason}")]
    MalformedField { field: String, reason: String },

    /// The Stash server could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The Stash server rejected the credentials.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The Stash server returned no matching record.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The Stash server answered with an error.
    #[error("Query failed: {0}")]
    Query(String),

    /// Writing the destination failed.
    #[error("Cannot write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination already exists and overwriting was not requested.
    #[error("Output file already exists: {} (use --overwrite to replace it)", .0.display())]
    OutputExists(PathBuf),
}

impl Error {
    /// Create a new Usage error.
    pub fn usage<S: Into<String>>(msg: S) -> Self {
        Self::Usage(msg.into())
    }

    /// Create a new UnsupportedKind error.
    pub fn unsupported_kind<S: Into<String>>(kind: S) -> Self {
        Self::UnsupportedKind(kind.into())
    }

    /// Create a new MalformedField error.
    pub fn malformed<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Self::MalformedField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        Self::Query(msg.into())
    }

    /// Create a new Output error for `path`.
    pub fn output<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }

    /// The category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Usage(_) => ErrorCategory::Usage,
            Self::FileNotFound(_)
            | Self::Unreadable { .. }
            | Self::InvalidJson { .. }
            | Self::TypeUndetermined => ErrorCategory::Input,
            Self::UnsupportedKind(_) | Self::MalformedField { .. } => ErrorCategory::Conversion,
            Self::ConnectionFailed(_)
            | Self::AuthenticationFailed(_)
            | Self::NotFound(_)
            | Self::Query(_) => ErrorCategory::Network,
            Self::Output { .. } | Self::OutputExists(_) => ErrorCategory::Output,
        }
    }

    /// Process exit code for this error: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Usage => 2,
            _ => 1,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
