//! Error types for the setup library.
//!
//! Every failure mode of an installation run maps to one variant here, so the
//! action boundary can report a single human-readable message. Variants that
//! wrap a lower-level cause carry that cause's message text for diagnosability.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for setup operations.
#[derive(Debug, Error)]
pub enum SetupError {
    // Input validation
    #[error("Invalid SurrealDB version format: \"{version}\"")]
    InvalidVersionFormat { version: String },

    // Platform detection
    #[error("Unable to determine operating system: {os}")]
    UnsupportedPlatform { os: String },

    #[error("Unable to determine the system architecture: {arch}")]
    UnsupportedArch { arch: String },

    // Release index
    #[error("The client request: {url} generated the error: {message}")]
    Transport { url: String, message: String },

    #[error("The retry count was exhausted for client request: {url}")]
    RetriesExhausted { url: String },

    #[error("The client request: {url} returned an unknown status code: {code} with message: {text}")]
    UnknownStatus { url: String, code: u16, text: String },

    #[error("Failed to parse release metadata: {message}")]
    ReleaseParse { message: String },

    // Asset selection
    #[error("No release asset matches the current platform for SurrealDB version: {version}")]
    NoMatchingAsset { version: String },

    #[error("Unable to determine the download url for SurrealDB version: {version}")]
    NoDownloadUrl { version: String },

    // Retrieval
    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    // File system
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Result type alias for setup operations.
pub type Result<T> = std::result::Result<T, SetupError>;

impl From<std::io::Error> for SetupError {
    fn from(err: std::io::Error) -> Self {
        SetupError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl SetupError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        SetupError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }
}
