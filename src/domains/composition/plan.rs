//! Composition plan model.
//!
//! A plan is the structured alternative to a single free-text prompt: an
//! ordered list of sections, each with its own style, mood and length.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Allowed drift between the plan total and the sum of its sections.
pub const DURATION_TOLERANCE_MS: u64 = 1_000;

/// Shortest section the generation API accepts.
pub const MIN_SECTION_MS: u64 = 1_000;

/// A single section of a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Section {
    /// Musical style description for this section.
    #[serde(alias = "prompt")]
    #[schemars(description = "Style description, e.g. 'steady lo-fi beat'")]
    pub style: String,

    /// Length of the section in milliseconds.
    #[schemars(description = "Section length in milliseconds")]
    pub duration_ms: u64,

    /// Emotional tone of the section.
    #[serde(default)]
    #[schemars(description = "Mood of the section, e.g. 'calm'")]
    pub mood: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruments: Option<Vec<String>>,
}

impl Section {
    pub fn new(style: impl Into<String>, duration_ms: u64, mood: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            duration_ms,
            mood: mood.into(),
            tempo: None,
            key: None,
            instruments: None,
        }
    }
}

/// A complete multi-section composition plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompositionPlan {
    /// Ordered sections of the piece.
    pub sections: Vec<Section>,

    /// Intended total length in milliseconds.
    #[serde(default)]
    pub total_duration_ms: u64,

    /// Overall mood of the piece.
    #[serde(default)]
    pub overall_mood: String,

    /// Optional genre hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl CompositionPlan {
    /// Sum of all section lengths.
    pub fn sections_duration_ms(&self) -> u64 {
        self.sections.iter().map(|s| s.duration_ms).sum()
    }

    /// Style of the first section, used to name saved files.
    pub fn lead_style(&self) -> Option<&str> {
        self.sections.first().map(|s| s.style.as_str())
    }

    /// Check that the plan is usable for generation.
    ///
    /// A valid plan has at least one section, a section total within
    /// [`DURATION_TOLERANCE_MS`] of `total_duration_ms`, no section shorter
    /// than [`MIN_SECTION_MS`], and a style and mood on every section.
    pub fn validate(&self) -> Result<(), String> {
        if self.sections.is_empty() {
            warn!("Plan has no sections");
            return Err("Plan has no sections".to_string());
        }

        let sum = self.sections_duration_ms();
        if sum.abs_diff(self.total_duration_ms) > DURATION_TOLERANCE_MS {
            warn!(
                "Duration mismatch: sections={}ms, plan={}ms",
                sum, self.total_duration_ms
            );
            return Err(format!(
                "Duration mismatch: sections sum to {}ms but plan declares {}ms",
                sum, self.total_duration_ms
            ));
        }

        for (i, section) in self.sections.iter().enumerate() {
            if section.duration_ms < MIN_SECTION_MS {
                return Err(format!(
                    "Section {} too short: {}ms (minimum {}ms)",
                    i, section.duration_ms, MIN_SECTION_MS
                ));
            }
            if section.style.trim().is_empty() || section.mood.trim().is_empty() {
                return Err(format!("Section {} missing style or mood", i));
            }
        }

        debug!(
            "Plan validated: {} sections, {}ms",
            self.sections.len(),
            self.total_duration_ms
        );
        Ok(())
    }
}
