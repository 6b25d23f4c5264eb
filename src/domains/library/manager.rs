//! File manager for generated music.
//!
//! Layout: `{base}/{YYYY-MM}/{YYYY-MM-DD}_{slug}_{NNN}.{ext}` with a JSON
//! metadata file of the same stem next to each track.

use chrono::{DateTime, Local};
use serde_json::{Map, Value, json};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::Builder;
use tracing::{debug, info};

use super::error::LibraryError;

const MAX_SLUG_LEN: usize = 30;
const FALLBACK_SLUG: &str = "music";
const FALLBACK_EXTENSION: &str = "mp3";

/// Paths of a saved track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedMusic {
    pub audio_path: PathBuf,
    pub metadata_path: PathBuf,
    pub file_size_bytes: usize,
}

impl SavedMusic {
    pub fn file_name(&self) -> String {
        self.audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Saves audio and metadata under the music output directory.
#[derive(Debug, Clone)]
pub struct FileManager {
    base_dir: PathBuf,
}

impl FileManager {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        info!("FileManager initialized with base directory: {}", base_dir.display());
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Save a track and its metadata.
    ///
    /// The metadata map is written with `audio_path`, `saved_at` and
    /// `file_size_bytes` added.
    pub fn save_music(
        &self,
        audio: &[u8],
        metadata: Map<String, Value>,
        prompt: &str,
        output_format: &str,
    ) -> Result<SavedMusic, LibraryError> {
        self.save_music_at(Local::now(), audio, metadata, prompt, output_format)
    }

    fn save_music_at(
        &self,
        now: DateTime<Local>,
        audio: &[u8],
        mut metadata: Map<String, Value>,
        prompt: &str,
        output_format: &str,
    ) -> Result<SavedMusic, LibraryError> {
        let month_dir = self.base_dir.join(now.format("%Y-%m").to_string());
        fs::create_dir_all(&month_dir).map_err(|source| LibraryError::Write {
            path: month_dir.clone(),
            source,
        })?;

        let date = now.format("%Y-%m-%d").to_string();
        let slug = slugify(prompt);
        let counter = next_counter(&month_dir, &date, &slug);
        let stem = format!("{}_{}_{:03}", date, slug, counter);

        let audio_path = month_dir.join(format!("{}.{}", stem, extension_for_format(output_format)));
        let metadata_path = month_dir.join(format!("{}.json", stem));

        info!("Saving music to {}", audio_path.display());
        atomic_write(&audio_path, audio)?;

        metadata.insert("audio_path".to_string(), json!(audio_path.display().to_string()));
        metadata.insert("saved_at".to_string(), json!(Local::now().to_rfc3339()));
        metadata.insert("file_size_bytes".to_string(), json!(audio.len()));
        let encoded = serde_json::to_vec_pretty(&Value::Object(metadata))?;
        atomic_write(&metadata_path, &encoded)?;

        info!(
            "Saved music: {} ({} bytes)",
            audio_path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default(),
            audio.len()
        );

        Ok(SavedMusic {
            audio_path,
            metadata_path,
            file_size_bytes: audio.len(),
        })
    }
}

/// Filesystem-safe slug of at most 30 characters.
///
/// `"Lo-fi Hip Hop Beats"` becomes `"lo_fi_hip_hop_beats"`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_sep = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '_' || c == '-' {
            pending_sep = true;
        }
    }

    let truncated: String = slug.chars().take(MAX_SLUG_LEN).collect();
    let trimmed = truncated.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// File extension for an output format tag such as `mp3_44100_128`.
pub fn extension_for_format(output_format: &str) -> String {
    let codec = output_format.split('_').next().unwrap_or_default().to_lowercase();
    if !codec.is_empty() && codec.chars().all(|c| c.is_ascii_alphanumeric()) {
        codec
    } else {
        FALLBACK_EXTENSION.to_string()
    }
}

/// One past the highest counter already used for `date` and `slug`.
fn next_counter(dir: &Path, date: &str, slug: &str) -> u32 {
    let prefix = format!("{}_{}_", date, slug);
    let Ok(entries) = fs::read_dir(dir) else {
        return 1;
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                return None;
            }
            let stem = path.file_stem()?.to_str()?.to_string();
            let digits = stem.strip_prefix(&prefix)?;
            if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                digits.parse::<u32>().ok()
            } else {
                None
            }
        })
        .max()
        .map_or(1, |n| n + 1)
}

/// Write through a temp file in the target directory, then rename.
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), LibraryError> {
    let write_error = |source: std::io::Error| LibraryError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut tmp = Builder::new()
        .prefix(".music_")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_error)?;
    tmp.write_all(data).map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;

    debug!("Atomically wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 11, 16, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Lo-fi Hip Hop Beats"), "lo_fi_hip_hop_beats");
        assert_eq!(slugify("Calm Piano (2 min)"), "calm_piano_2_min");
        assert_eq!(slugify("  --__  "), "music");
        assert_eq!(slugify(""), "music");
        assert_eq!(slugify("ambient (structured)"), "ambient_structured");
        assert_eq!(
            slugify("a very long prompt that keeps going and going"),
            "a_very_long_prompt_that_keeps"
        );
        assert_eq!(slugify("abcdefghij abcdefghij abcdefgh xyz"), "abcdefghij_abcdefghij_abcdefgh");
    }

    #[test]
    fn test_extension_for_format() {
        assert_eq!(extension_for_format("mp3_44100_128"), "mp3");
        assert_eq!(extension_for_format("pcm_16000"), "pcm");
        assert_eq!(extension_for_format(""), "mp3");
        assert_eq!(extension_for_format("../evil"), "mp3");
    }

    #[test]
    fn test_save_music_layout_and_counter() {
        let dir = TempDir::new().unwrap();
        let manager = FileManager::new(dir.path());
        let mut metadata = Map::new();
        metadata.insert("prompt".to_string(), json!("Lo-fi beats"));

        let first = manager
            .save_music_at(fixed_time(), b"abc", metadata.clone(), "Lo-fi beats", "mp3_44100_128")
            .unwrap();
        let second = manager
            .save_music_at(fixed_time(), b"defg", metadata, "Lo-fi beats", "mp3_44100_128")
            .unwrap();

        assert_eq!(
            first.audio_path,
            dir.path().join("2025-11").join("2025-11-16_lo_fi_beats_001.mp3")
        );
        assert_eq!(second.file_name(), "2025-11-16_lo_fi_beats_002.mp3");
        assert_eq!(fs::read(&second.audio_path).unwrap(), b"defg");

        let meta: Value = serde_json::from_slice(&fs::read(&first.metadata_path).unwrap()).unwrap();
        assert_eq!(meta["prompt"], "Lo-fi beats");
        assert_eq!(meta["file_size_bytes"], 3);
        assert!(meta["audio_path"].as_str().unwrap().ends_with("_001.mp3"));
        assert!(meta["saved_at"].is_string());
    }

    #[test]
    fn test_counter_continues_after_gap() {
        let dir = TempDir::new().unwrap();
        let month = dir.path().join("2025-11");
        fs::create_dir_all(&month).unwrap();
        fs::write(month.join("2025-11-16_rain_007.mp3"), b"x").unwrap();
        fs::write(month.join("2025-11-16_rain_drops_020.mp3"), b"x").unwrap();

        let manager = FileManager::new(dir.path());
        let saved = manager
            .save_music_at(fixed_time(), b"x", Map::new(), "rain", "mp3_44100_128")
            .unwrap();
        assert_eq!(saved.file_name(), "2025-11-16_rain_008.mp3");
    }

    #[test]
    fn test_counter_grows_past_three_digits() {
        let dir = TempDir::new().unwrap();
        let month = dir.path().join("2025-11");
        fs::create_dir_all(&month).unwrap();
        fs::write(month.join("2025-11-16_rain_999.mp3"), b"old").unwrap();
        fs::write(month.join("2025-11-16_rain_1000.mp3"), b"older").unwrap();

        let manager = FileManager::new(dir.path());
        let saved = manager
            .save_music_at(fixed_time(), b"new", Map::new(), "rain", "mp3_44100_128")
            .unwrap();
        assert_eq!(saved.file_name(), "2025-11-16_rain_1001.mp3");
        assert_eq!(fs::read(month.join("2025-11-16_rain_1000.mp3")).unwrap(), b"older");
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let manager = FileManager::new(dir.path());
        manager
            .save_music_at(fixed_time(), b"x", Map::new(), "tidy", "mp3_44100_128")
            .unwrap();
        let names: Vec<String> = fs::read_dir(dir.path().join("2025-11"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.iter().all(|n| !n.ends_with(".tmp")));
    }
}
