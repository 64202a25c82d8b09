//! Error types for the sync pipeline.
//!
//! Only two kinds of failure ever abort a run:
//!
//! - **Fetch failures**: the source CSV could not be retrieved as text
//! - **Write failures**: an output artifact could not be written
//!
//! Irregular CSV rows are never errors. The mapper skips them and reports a
//! count instead (see [`crate::transform::ParseOutcome`]).

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Fatal errors raised while syncing the spreadsheet.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The configured source URL could not be parsed or uses an unsupported scheme.
    #[error("invalid source URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request did not complete within the configured timeout.
    #[error("fetching {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    /// The server answered with a non-success status.
    #[error("server returned {status} for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The response body is not valid UTF-8 text.
    #[error("response from {url} is not UTF-8 text: {source}")]
    NotText {
        url: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The response body was empty.
    #[error("response from {url} was empty")]
    EmptyBody { url: String },

    /// The server answered with an HTML page (sign-in wall, unpublished sheet) instead of CSV.
    #[error("response from {url} is not CSV (content type {content_type:?})")]
    NotCsv { url: String, content_type: String },

    /// An output artifact could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The article collection could not be serialized.
    #[error("failed to serialize articles: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SyncError {
    /// `true` for every error raised while obtaining the source text.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidUrl { .. }
                | SyncError::Fetch { .. }
                | SyncError::Timeout { .. }
                | SyncError::HttpStatus { .. }
                | SyncError::NotText { .. }
                | SyncError::EmptyBody { .. }
                | SyncError::NotCsv { .. }
        )
    }

    /// `true` for every error raised while producing the output artifacts.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, SyncError::Write { .. } | SyncError::Serialize(_))
    }
}
