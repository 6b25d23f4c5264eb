//! Preference record model.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::PreferenceError;

/// One logged generation or rating of a prompt.
///
/// Records are appended and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub prompt: String,
    pub liked: bool,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
}

/// Optional tags attached to a new record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceTags {
    pub context: Option<String>,
    pub activity: Option<String>,
    pub mood: Option<String>,
    pub duration_ms: Option<u64>,
}

impl PreferenceTags {
    pub fn activity(mut self, activity: impl Into<String>) -> Self {
        self.activity = Some(activity.into());
        self
    }

    pub fn mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = Some(mood.into());
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl PreferenceRecord {
    /// New record stamped with the current time.
    pub fn new(prompt: impl Into<String>, liked: bool, tags: PreferenceTags) -> Self {
        Self {
            prompt: prompt.into(),
            liked,
            context: non_empty(tags.context),
            activity: non_empty(tags.activity),
            mood: non_empty(tags.mood),
            timestamp: Utc::now(),
            duration_ms: tags.duration_ms,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Explicit user feedback on a generated track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Like,
    Dislike,
    Skip,
    Replay,
}

impl FeedbackKind {
    /// `like` and `replay` count as liked.
    pub fn is_positive(self) -> bool {
        matches!(self, Self::Like | Self::Replay)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
            Self::Skip => "skip",
            Self::Replay => "replay",
        }
    }
}

impl FromStr for FeedbackKind {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            "skip" => Ok(Self::Skip),
            "replay" => Ok(Self::Replay),
            other => Err(PreferenceError::InvalidFeedback(other.to_string())),
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accept RFC 3339 timestamps, and naive ISO-8601 ones as local time.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| format!("timestamp '{}' does not exist in local time", raw))
}
