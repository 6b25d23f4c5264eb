//! Storage backends for the preference store.
//!
//! The store keeps the whole collection in memory and hands the full slice
//! to the backend on every mutation.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

use super::error::PreferenceError;
use super::record::PreferenceRecord;

/// File name used inside a preference directory.
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Pluggable persistence for preference records.
pub trait PreferenceBackend: Send + Sync + fmt::Debug {
    /// Load every persisted record, oldest first.
    fn load(&self) -> Result<Vec<PreferenceRecord>, PreferenceError>;

    /// Replace the persisted collection with `records`.
    fn save(&self, records: &[PreferenceRecord]) -> Result<(), PreferenceError>;

    /// Where the records live, for logs and diagnostics.
    fn location(&self) -> String;
}

/// One JSON array in a file, rewritten wholesale through a temp file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backend for `preferences.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<PreferenceRecord>, PreferenceError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        read_records(&self.path)
    }

    fn save(&self, records: &[PreferenceRecord]) -> Result<(), PreferenceError> {
        write_records_atomic(&self.path, records)?;
        debug!("Saved {} preferences to {}", records.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Keeps the last saved collection in memory only.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    saved: Mutex<Vec<PreferenceRecord>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that starts out holding `records`.
    pub fn with_records(records: Vec<PreferenceRecord>) -> Self {
        Self {
            saved: Mutex::new(records),
        }
    }
}

impl PreferenceBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<PreferenceRecord>, PreferenceError> {
        Ok(self.saved.lock().map(|r| r.clone()).unwrap_or_default())
    }

    fn save(&self, records: &[PreferenceRecord]) -> Result<(), PreferenceError> {
        if let Ok(mut saved) = self.saved.lock() {
            *saved = records.to_vec();
        }
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Read a JSON array of records from `path`.
pub(crate) fn read_records(path: &Path) -> Result<Vec<PreferenceRecord>, PreferenceError> {
    let content = fs::read_to_string(path).map_err(|source| PreferenceError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|e| PreferenceError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write records as pretty JSON, replacing `path` only once the data is on
/// disk.
pub(crate) fn write_records_atomic(
    path: &Path,
    records: &[PreferenceRecord],
) -> Result<(), PreferenceError> {
    let write_failed = |source: std::io::Error| PreferenceError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(write_failed)?;

    let json = serde_json::to_vec_pretty(records)
        .map_err(|e| write_failed(std::io::Error::other(e)))?;

    let mut tmp = NamedTempFile::new_in(&parent).map_err(write_failed)?;
    tmp.write_all(&json).map_err(write_failed)?;
    tmp.as_file().sync_all().map_err(write_failed)?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}
