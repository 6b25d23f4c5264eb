//! Preference store.
//!
//! An append-only log of liked and disliked prompts with a small query
//! surface for recommendations and statistics. Every mutation persists the
//! whole collection through the configured [`PreferenceBackend`].

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, error, info, warn};

use super::backend::{JsonFileBackend, MemoryBackend, PreferenceBackend, read_records, write_records_atomic};
use super::error::PreferenceError;
use super::record::{FeedbackKind, PreferenceRecord, PreferenceTags};

const STATS_FAVORITES: usize = 3;
const STATS_RECENT: usize = 5;

/// Outcome of persisting after a mutation.
///
/// Mutations never fail because of storage; the in-memory collection is
/// always updated and this value reports what happened on disk.
#[must_use]
#[derive(Debug)]
pub enum SaveStatus {
    /// The collection was written.
    Saved,
    /// Nothing changed, so nothing was written.
    Unchanged,
    /// The write failed; the in-memory collection is ahead of storage.
    Failed(PreferenceError),
}

impl SaveStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn error(&self) -> Option<&PreferenceError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Human-readable warning for tool responses, if persisting failed.
    pub fn warning(&self) -> Option<String> {
        self.error().map(|e| format!("Preference could not be saved: {}", e))
    }
}

/// Result of age-based pruning.
#[must_use]
#[derive(Debug)]
pub struct PruneReport {
    pub removed: usize,
    pub status: SaveStatus,
}

/// Result of importing records from a file.
#[must_use]
#[derive(Debug)]
pub struct ImportReport {
    pub imported: usize,
    pub status: SaveStatus,
}

/// Aggregate view of the collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceStatistics {
    pub total_generations: usize,
    pub liked_count: usize,
    pub disliked_count: usize,
    pub like_rate: f64,
    pub favorite_moods: Vec<String>,
    pub favorite_activities: Vec<String>,
    pub most_recent: Vec<PreferenceRecord>,
}

/// In-memory preference log backed by a [`PreferenceBackend`].
#[derive(Debug)]
pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
    records: Vec<PreferenceRecord>,
}

impl PreferenceStore {
    /// Open a store, starting empty if the persisted data cannot be loaded.
    pub fn open(backend: Box<dyn PreferenceBackend>) -> Self {
        let records = match backend.load() {
            Ok(records) => {
                info!("Loaded {} preferences from {}", records.len(), backend.location());
                records
            }
            Err(e) => {
                error!("Error loading preferences, starting empty: {}", e);
                Vec::new()
            }
        };
        Self { backend, records }
    }

    /// Open the `preferences.json` store inside `dir`.
    pub fn open_dir(dir: impl AsRef<Path>) -> Self {
        Self::open(Box::new(JsonFileBackend::in_dir(dir)))
    }

    /// Store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryBackend::new()))
    }

    pub fn records(&self) -> &[PreferenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Append a record stamped with the current time and persist.
    pub fn record_preference(
        &mut self,
        prompt: impl Into<String>,
        liked: bool,
        tags: PreferenceTags,
    ) -> SaveStatus {
        let record = PreferenceRecord::new(prompt, liked, tags);
        info!(
            "Recorded preference: '{}' (liked={}, activity={:?})",
            record.prompt.chars().take(50).collect::<String>(),
            record.liked,
            record.activity
        );
        self.records.push(record);
        self.persist()
    }

    /// Record a completed generation.
    ///
    /// A generation always counts as liked. Tags are taken from the
    /// `context`, `activity`, `mood` and `duration_ms` keys of `metadata`.
    pub fn record_generation(
        &mut self,
        prompt: impl Into<String>,
        metadata: &Value,
        result_location: &Path,
    ) -> SaveStatus {
        let text = |key: &str| metadata.get(key).and_then(Value::as_str).map(str::to_string);
        let tags = PreferenceTags {
            context: text("context"),
            activity: text("activity"),
            mood: text("mood"),
            duration_ms: metadata.get("duration_ms").and_then(Value::as_u64),
        };
        debug!("Recording generation saved at {}", result_location.display());
        self.record_preference(prompt, true, tags)
    }

    /// Record explicit feedback on a prompt.
    pub fn record_feedback(
        &mut self,
        prompt: impl Into<String>,
        feedback: FeedbackKind,
        tags: PreferenceTags,
    ) -> SaveStatus {
        self.record_preference(prompt, feedback.is_positive(), tags)
    }

    /// Previously liked prompts for a context, most recent first.
    ///
    /// Activity and mood filters use exact matches. When they leave nothing,
    /// the full liked set is used instead. Prompts are deduplicated.
    pub fn get_recommendations(
        &self,
        activity: Option<&str>,
        mood: Option<&str>,
        limit: usize,
    ) -> Vec<String> {
        let liked: Vec<&PreferenceRecord> = self.records.iter().filter(|r| r.liked).collect();
        if liked.is_empty() {
            return Vec::new();
        }

        let activity = activity.filter(|a| !a.is_empty());
        let mood = mood.filter(|m| !m.is_empty());

        let filtered: Vec<&PreferenceRecord> = liked
            .iter()
            .copied()
            .filter(|r| activity.is_none_or(|a| r.activity.as_deref() == Some(a)))
            .filter(|r| mood.is_none_or(|m| r.mood.as_deref() == Some(m)))
            .collect();

        let candidates = if filtered.is_empty() {
            debug!("No liked preferences match activity={:?}, mood={:?}; using all liked", activity, mood);
            &liked
        } else {
            &filtered
        };

        let mut seen = HashSet::new();
        let recommendations: Vec<String> = candidates
            .iter()
            .rev()
            .filter(|r| seen.insert(r.prompt.as_str()))
            .take(limit)
            .map(|r| r.prompt.clone())
            .collect();

        info!(
            "Generated {} recommendations for activity={:?}, mood={:?}",
            recommendations.len(),
            activity,
            mood
        );
        recommendations
    }

    /// Most frequent moods among liked records.
    pub fn get_favorite_moods(&self, limit: usize) -> Vec<String> {
        self.favorites(limit, |r| r.mood.as_deref())
    }

    /// Most frequent activities among liked records.
    pub fn get_favorite_activities(&self, limit: usize) -> Vec<String> {
        self.favorites(limit, |r| r.activity.as_deref())
    }

    fn favorites<F>(&self, limit: usize, tag: F) -> Vec<String>
    where
        F: Fn(&PreferenceRecord) -> Option<&str>,
    {
        // (tag, count) in first-seen order
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for value in self.records.iter().filter(|r| r.liked).filter_map(&tag) {
            if value.is_empty() {
                continue;
            }
            match counts.iter_mut().find(|(t, _)| *t == value) {
                Some((_, n)) => *n += 1,
                None => counts.push((value, 1)),
            }
        }
        // stable sort keeps first-seen order among ties
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().take(limit).map(|(t, _)| t.to_string()).collect()
    }

    pub fn get_statistics(&self) -> PreferenceStatistics {
        let total = self.records.len();
        let liked = self.records.iter().filter(|r| r.liked).count();
        let recent_start = total.saturating_sub(STATS_RECENT);

        PreferenceStatistics {
            total_generations: total,
            liked_count: liked,
            disliked_count: total - liked,
            like_rate: if total > 0 { liked as f64 / total as f64 } else { 0.0 },
            favorite_moods: self.get_favorite_moods(STATS_FAVORITES),
            favorite_activities: self.get_favorite_activities(STATS_FAVORITES),
            most_recent: self.records[recent_start..].to_vec(),
        }
    }

    /// Remove records older than `days` days.
    pub fn clear_old_preferences(&mut self, days: u32) -> PruneReport {
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let report = self.clear_before(cutoff);
        if report.removed > 0 {
            info!("Removed {} old preferences (older than {} days)", report.removed, days);
        }
        report
    }

    fn clear_before(&mut self, cutoff: DateTime<Utc>) -> PruneReport {
        let before = self.records.len();
        self.records.retain(|r| r.timestamp > cutoff);
        let removed = before - self.records.len();

        let status = if removed > 0 {
            self.persist()
        } else {
            SaveStatus::Unchanged
        };
        PruneReport { removed, status }
    }

    /// Write the full collection to `path`.
    pub fn export_preferences(&self, path: &Path) -> Result<usize, PreferenceError> {
        write_records_atomic(path, &self.records)?;
        info!("Exported {} preferences to {}", self.records.len(), path.display());
        Ok(self.records.len())
    }

    /// Load records from `path`, appending them or replacing the collection.
    pub fn import_preferences(&mut self, path: &Path, merge: bool) -> Result<ImportReport, PreferenceError> {
        let imported = read_records(path)?;
        let count = imported.len();

        if merge {
            self.records.extend(imported);
        } else {
            self.records = imported;
        }

        let status = self.persist();
        info!("Imported {} preferences (merge={})", count, merge);
        Ok(ImportReport {
            imported: count,
            status,
        })
    }

    fn persist(&self) -> SaveStatus {
        match self.backend.save(&self.records) {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                warn!("Error saving preferences: {}", e);
                SaveStatus::Failed(e)
            }
        }
    }
}
