//! Composition planner.
//!
//! Turns a high-level request ("focus music for coding", "calm to
//! energetic") into a [`CompositionPlan`]. Resolution order for a free-text
//! prompt is: template keywords, then an explicit mood progression, then a
//! single-mood plan sized by duration.

use regex::Regex;
use std::sync::LazyLock;
use tracing::info;

use super::error::PlanError;
use super::plan::{CompositionPlan, Section};
use super::templates::{CompositionTemplate, TEMPLATES, find_template, template_names};

/// Duration used when a template is requested without one.
pub const DEFAULT_TOTAL_MS: u64 = 60_000;

static PROGRESSION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\w+)\s+to\s+(\w+)",
        r"(\w+)\s*→\s*(\w+)",
        r"from\s+(\w+)\s+to\s+(\w+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("progression pattern is valid"))
    .collect()
});

const MOOD_KEYWORDS: &[(&str, &[&str])] = &[
    ("calm", &["calm", "peaceful", "gentle", "quiet", "serene"]),
    ("energetic", &["energetic", "upbeat", "lively", "exciting", "dynamic"]),
    ("focused", &["focus", "concentration", "steady", "determined"]),
    ("happy", &["happy", "joyful", "cheerful", "uplifting"]),
    ("melancholic", &["sad", "melancholic", "somber", "reflective"]),
    ("dramatic", &["dramatic", "epic", "powerful", "intense"]),
    ("creative", &["creative", "inspiring", "flowing", "imaginative"]),
];

const GENRES: &[&str] = &[
    "ambient",
    "lo-fi",
    "electronic",
    "orchestral",
    "piano",
    "jazz",
    "classical",
];

/// A detected start/end mood pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodProgression {
    pub start: String,
    pub end: String,
}

impl MoodProgression {
    /// Parse a user-supplied "X to Y" progression string.
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        let (start, end) = lower.split_once(" to ")?;
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() || end.contains(" to ") {
            return None;
        }
        Some(Self {
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}

/// Builds composition plans from prompts, templates and mood progressions.
#[derive(Debug, Clone, Default)]
pub struct CompositionPlanner;

impl CompositionPlanner {
    pub fn new() -> Self {
        info!("CompositionPlanner initialized with {} templates", TEMPLATES.len());
        Self
    }

    /// All available templates.
    pub fn templates(&self) -> &'static [CompositionTemplate] {
        TEMPLATES
    }

    /// Analyze a prompt and build a plan for it.
    ///
    /// `num_sections` forces the section count for progression and mood
    /// plans; template plans always keep the template's shape.
    pub fn plan_from_prompt(
        &self,
        prompt: &str,
        total_duration_ms: u64,
        num_sections: Option<usize>,
    ) -> Result<CompositionPlan, PlanError> {
        info!("Creating plan from prompt: '{}'", preview(prompt));

        if let Some(template) = self.detect_template(prompt) {
            info!("Using template: {}", template);
            return self.from_template(template, Some(total_duration_ms));
        }

        if let Some(progression) = self.detect_progression(prompt) {
            info!(
                "Detected progression: {} -> {}",
                progression.start, progression.end
            );
            return self.progressive_plan(
                &progression.start,
                &progression.end,
                total_duration_ms,
                num_sections.unwrap_or(3),
            );
        }

        let mood = extract_mood(prompt);
        let count = num_sections.unwrap_or_else(|| suggest_section_count(total_duration_ms));
        if count == 0 {
            return Err(PlanError::InvalidSectionCount(count));
        }

        Ok(CompositionPlan {
            sections: sections_for_mood(mood, total_duration_ms, count),
            total_duration_ms,
            overall_mood: mood.to_string(),
            genre: extract_genre(prompt).map(str::to_string),
        })
    }

    /// Build a plan that moves gradually from one mood to another.
    pub fn progressive_plan(
        &self,
        start_mood: &str,
        end_mood: &str,
        duration_ms: u64,
        num_sections: usize,
    ) -> Result<CompositionPlan, PlanError> {
        if num_sections == 0 {
            return Err(PlanError::InvalidSectionCount(num_sections));
        }
        info!("Creating progressive plan: {} -> {}", start_mood, end_mood);

        let section_ms = duration_ms / num_sections as u64;
        let sections = interpolate_moods(start_mood, end_mood, num_sections)
            .into_iter()
            .enumerate()
            .map(|(i, mood)| Section::new(mood_to_style(&mood, i, num_sections), section_ms, mood))
            .collect();

        Ok(CompositionPlan {
            sections,
            total_duration_ms: duration_ms,
            overall_mood: format!("{}_to_{}", start_mood, end_mood),
            genre: None,
        })
    }

    /// Build a plan from a named template.
    pub fn from_template(
        &self,
        template_name: &str,
        duration_ms: Option<u64>,
    ) -> Result<CompositionPlan, PlanError> {
        let template = find_template(template_name).ok_or_else(|| PlanError::UnknownTemplate {
            name: template_name.to_string(),
            available: template_names().join(", "),
        })?;
        let total = duration_ms.unwrap_or(DEFAULT_TOTAL_MS);

        let sections = template
            .sections
            .iter()
            .map(|s| Section::new(s.style, (total as f64 * s.share).round() as u64, s.mood))
            .collect();

        Ok(CompositionPlan {
            sections,
            total_duration_ms: total,
            overall_mood: template.overall_mood.to_string(),
            genre: Some(template.genre.to_string()),
        })
    }

    /// Name of the first template whose keywords appear in the prompt.
    pub fn detect_template(&self, prompt: &str) -> Option<&'static str> {
        let lower = prompt.to_lowercase();
        TEMPLATES
            .iter()
            .find(|t| t.keywords.iter().any(|k| lower.contains(k)))
            .map(|t| t.name)
    }

    /// Detect a mood progression phrase in a prompt.
    pub fn detect_progression(&self, prompt: &str) -> Option<MoodProgression> {
        let lower = prompt.to_lowercase();

        for pattern in PROGRESSION_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(&lower) {
                return Some(MoodProgression {
                    start: caps[1].to_string(),
                    end: caps[2].to_string(),
                });
            }
        }

        if lower.contains("build") && (lower.contains("tension") || lower.contains("energy")) {
            return Some(MoodProgression {
                start: "calm".to_string(),
                end: "energetic".to_string(),
            });
        }

        if lower.contains("wind down") || lower.contains("cool down") {
            return Some(MoodProgression {
                start: "energetic".to_string(),
                end: "calm".to_string(),
            });
        }

        None
    }

    /// Human-readable summary of how a plan was built.
    pub fn explain(&self, plan: &CompositionPlan, template: Option<&str>) -> String {
        let sections = &plan.sections;
        match (sections.as_slice(), template) {
            ([], _) => "Created basic plan".to_string(),
            (_, Some(name)) => format!("Used '{}' template with {} sections", name, sections.len()),
            ([only], None) => format!("Single section: {}", only.style),
            ([first, .., last], None) => format!(
                "Created {}-section plan progressing from '{}' to '{}'",
                sections.len(),
                truncate(&first.style, 30),
                truncate(&last.style, 30)
            ),
        }
    }
}

/// Primary mood keyword in a prompt, `neutral` when none matches.
pub fn extract_mood(prompt: &str) -> &'static str {
    let lower = prompt.to_lowercase();
    MOOD_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(mood, _)| *mood)
        .unwrap_or("neutral")
}

/// Genre hint in a prompt, if any.
pub fn extract_genre(prompt: &str) -> Option<&'static str> {
    let lower = prompt.to_lowercase();
    GENRES.iter().copied().find(|g| lower.contains(g))
}

/// Section count that suits a total duration.
pub fn suggest_section_count(duration_ms: u64) -> usize {
    match duration_ms {
        0..30_000 => 1,
        30_000..90_000 => 2,
        90_000..180_000 => 3,
        _ => 4,
    }
}

fn sections_for_mood(mood: &str, total_ms: u64, count: usize) -> Vec<Section> {
    let section_ms = total_ms / count as u64;
    (0..count)
        .map(|i| {
            let style = if count == 1 {
                format!("{} atmosphere throughout", mood)
            } else if i == 0 {
                format!("{} intro", mood)
            } else if i == count - 1 {
                format!("{} outro", mood)
            } else {
                format!("{} middle section", mood)
            };
            Section::new(style, section_ms, mood)
        })
        .collect()
}

fn interpolate_moods(start: &str, end: &str, steps: usize) -> Vec<String> {
    match steps {
        1 => vec![end.to_string()],
        2 => vec![start.to_string(), end.to_string()],
        3 => vec![
            start.to_string(),
            format!("{} transitioning to {}", start, end),
            end.to_string(),
        ],
        _ => {
            let mut moods = Vec::with_capacity(steps);
            moods.push(start.to_string());
            moods.extend((0..steps - 2).map(|_| format!("transitioning from {} to {}", start, end)));
            moods.push(end.to_string());
            moods
        }
    }
}

fn mood_to_style(mood: &str, position: usize, total: usize) -> String {
    let prefix = if total <= 1 {
        ""
    } else if position == 0 {
        "intro - "
    } else if position == total - 1 {
        "outro - "
    } else {
        "middle - "
    };
    format!("{}{} section", prefix, mood)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn preview(text: &str) -> String {
    truncate(text, 50)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> CompositionPlanner {
        CompositionPlanner::new()
    }

    #[test]
    fn test_template_detected_from_prompt() {
        let plan = planner()
            .plan_from_prompt("focus music for coding", 60_000, None)
            .unwrap();
        assert_eq!(plan.sections.len(), 3);
        assert_eq!(plan.overall_mood, "focused");
        assert_eq!(plan.genre.as_deref(), Some("lo-fi"));
        assert_eq!(plan.sections[1].duration_ms, 42_000);
    }

    #[test]
    fn test_dramatic_template_has_four_sections() {
        let plan = planner()
            .plan_from_prompt("epic cinematic piece", 120_000, None)
            .unwrap();
        assert_eq!(plan.sections.len(), 4);
        assert_eq!(plan.sections[2].mood, "peak");
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn test_progression_detected() {
        let p = planner();
        let detected = p.detect_progression("happy to sad").unwrap();
        assert_eq!(detected.start, "happy");
        assert_eq!(detected.end, "sad");

        let arrow = p.detect_progression("tense → resolved").unwrap();
        assert_eq!(arrow.start, "tense");
        assert_eq!(arrow.end, "resolved");

        let wind = p.detect_progression("something to wind down").unwrap();
        assert_eq!(wind.start, "something");

        let cool = p.detect_progression("please cool down").unwrap();
        assert_eq!(cool.start, "energetic");
        assert_eq!(cool.end, "calm");
    }

    #[test]
    fn test_progressive_plan_shapes() {
        let p = planner();
        let plan = p.progressive_plan("calm", "energetic", 90_000, 3).unwrap();
        assert_eq!(plan.sections.len(), 3);
        assert_eq!(plan.sections[0].style, "intro - calm section");
        assert_eq!(plan.sections[1].mood, "calm transitioning to energetic");
        assert_eq!(plan.sections[2].style, "outro - energetic section");
        assert_eq!(plan.overall_mood, "calm_to_energetic");

        let long = p.progressive_plan("calm", "energetic", 100_000, 5).unwrap();
        assert_eq!(long.sections[2].mood, "transitioning from calm to energetic");
        assert_eq!(long.sections[2].style, "middle - transitioning from calm to energetic section");

        let single = p.progressive_plan("calm", "happy", 20_000, 1).unwrap();
        assert_eq!(single.sections[0].style, "happy section");

        assert!(p.progressive_plan("calm", "happy", 20_000, 0).is_err());
    }

    #[test]
    fn test_mood_plan_fallback() {
        let plan = planner()
            .plan_from_prompt("joyful jazz", 100_000, None)
            .unwrap();
        assert_eq!(plan.overall_mood, "happy");
        assert_eq!(plan.genre.as_deref(), Some("jazz"));
        assert_eq!(plan.sections.len(), 3);
        assert_eq!(plan.sections[0].style, "happy intro");
        assert_eq!(plan.sections[1].style, "happy middle section");
        assert_eq!(plan.sections[2].style, "happy outro");
    }

    #[test]
    fn test_unknown_template() {
        let err = planner().from_template("polka", None).unwrap_err();
        assert!(err.to_string().contains("focus_work"));
    }

    #[test]
    fn test_section_count_by_duration() {
        assert_eq!(suggest_section_count(10_000), 1);
        assert_eq!(suggest_section_count(60_000), 2);
        assert_eq!(suggest_section_count(120_000), 3);
        assert_eq!(suggest_section_count(240_000), 4);
    }

    #[test]
    fn test_parse_progression_argument() {
        let p = MoodProgression::parse("Calm to Energetic").unwrap();
        assert_eq!(p.start, "calm");
        assert_eq!(p.end, "energetic");
        assert!(MoodProgression::parse("calm").is_none());
    }

    #[test]
    fn test_explain() {
        let p = planner();
        let plan = p.from_template("creative_flow", None).unwrap();
        assert_eq!(
            p.explain(&plan, Some("creative_flow")),
            "Used 'creative_flow' template with 3 sections"
        );
        assert!(p.explain(&plan, None).starts_with("Created 3-section plan"));
    }
}
