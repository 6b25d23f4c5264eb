//! Music library errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving generated music.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// A file or directory could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Metadata could not be encoded.
    #[error("Failed to encode metadata: {0}")]
    Metadata(#[from] serde_json::Error),
}
