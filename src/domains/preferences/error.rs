//! Preference store errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or exchanging preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Persisted data could not be read or parsed.
    #[error("Preference data at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The collection could not be written.
    #[error("Failed to write preferences to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be opened for reading.
    #[error("Failed to read preferences from {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unknown feedback label.
    #[error("Unknown feedback type '{0}'. Expected like, dislike, skip or replay")]
    InvalidFeedback(String),
}
