//! Context analyzer.
//!
//! Scores text against keyword tables to guess what the user feels and what
//! they are doing, then maps that context to a music prompt.

use serde::Serialize;
use tracing::info;

use super::keywords::{
    ACTIVITY_KEYWORDS, CONTEXT_PROMPTS, FALLBACK_PROMPT, MOOD_KEYWORDS, MOOD_PROMPTS, best_match,
};

/// Activity label used when nothing matches.
pub const UNKNOWN_ACTIVITY: &str = "unknown";

const NEUTRAL_MOOD: &str = "neutral";
const MESSAGE_WINDOW: usize = 5;
const MAX_INDICATORS: usize = 5;

/// Result of mood detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodAnalysis {
    pub primary_mood: String,
    /// 0.0 to 1.0
    pub intensity: f64,
    /// 0.0 to 1.0
    pub confidence: f64,
    pub indicators: Vec<String>,
    pub reasoning: String,
}

/// Result of analyzing a conversation window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextAnalysis {
    pub detected_mood: String,
    pub mood_intensity: f64,
    pub detected_activity: String,
    pub confidence: f64,
    pub indicators: Vec<String>,
    pub reasoning: String,
}

/// Suggested generation parameters for a detected mood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicSuggestion {
    pub prompt: String,
    pub duration_ms: u64,
    pub mood: String,
    pub reasoning: String,
}

/// Keyword-based mood and activity detector.
#[derive(Debug, Clone, Default)]
pub struct ContextAnalyzer;

impl ContextAnalyzer {
    pub fn new() -> Self {
        info!("ContextAnalyzer initialized");
        Self
    }

    /// Analyze the last few messages of a conversation.
    pub fn analyze_conversation(
        &self,
        recent_messages: &[String],
        activity_hint: Option<&str>,
    ) -> ContextAnalysis {
        let start = recent_messages.len().saturating_sub(MESSAGE_WINDOW);
        let context = recent_messages[start..].join(" ");
        info!("Analyzing context: '{}'", context.chars().take(100).collect::<String>());

        let mood = self.analyze_mood(&context);
        let activity = match activity_hint {
            Some(hint) if !hint.trim().is_empty() => hint.to_string(),
            _ => self.detect_activity(&context).0.to_string(),
        };

        ContextAnalysis {
            detected_mood: mood.primary_mood,
            mood_intensity: mood.intensity,
            detected_activity: activity,
            confidence: mood.confidence,
            indicators: mood.indicators,
            reasoning: mood.reasoning,
        }
    }

    /// Detect the dominant mood in a piece of text.
    pub fn analyze_mood(&self, text: &str) -> MoodAnalysis {
        let lower = text.to_lowercase();
        let Some((mood, matched)) = best_match(MOOD_KEYWORDS, &lower) else {
            return MoodAnalysis {
                primary_mood: NEUTRAL_MOOD.to_string(),
                intensity: 0.5,
                confidence: 0.3,
                indicators: Vec::new(),
                reasoning: "No strong mood indicators detected".to_string(),
            };
        };

        let score = matched.len() as f64;
        let reasoning = format!(
            "Detected '{}' mood based on keywords: {}",
            mood,
            matched.iter().take(3).copied().collect::<Vec<_>>().join(", ")
        );

        MoodAnalysis {
            primary_mood: mood.to_string(),
            intensity: (score / 3.0).min(1.0),
            confidence: (0.5 + score * 0.15).min(0.95),
            indicators: matched.iter().take(MAX_INDICATORS).map(|k| k.to_string()).collect(),
            reasoning,
        }
    }

    /// Detect the user's activity, with a confidence of 0.7 when a keyword
    /// matched and 0.3 otherwise.
    pub fn detect_activity(&self, text: &str) -> (&'static str, f64) {
        match best_match(ACTIVITY_KEYWORDS, &text.to_lowercase()) {
            Some((activity, _)) => (activity, 0.7),
            None => (UNKNOWN_ACTIVITY, 0.3),
        }
    }

    /// Music prompt for a mood and activity.
    pub fn suggest_music_for_context(&self, activity: &str, mood: &str) -> &'static str {
        info!("Suggesting music for: activity={}, mood={}", activity, mood);

        CONTEXT_PROMPTS
            .iter()
            .find(|((m, a), _)| *m == mood && *a == activity)
            .map(|(_, prompt)| *prompt)
            .or_else(|| {
                MOOD_PROMPTS
                    .iter()
                    .find(|(m, _)| *m == mood)
                    .map(|(_, prompt)| *prompt)
            })
            .unwrap_or(FALLBACK_PROMPT)
    }

    /// Prompt, duration and reasoning for a mood analysis.
    pub fn suggest_music_params(&self, mood: &MoodAnalysis, activity: Option<&str>) -> MusicSuggestion {
        let activity = activity.unwrap_or(UNKNOWN_ACTIVITY);
        let prompt = self.suggest_music_for_context(activity, &mood.primary_mood);
        let duration_ms = if mood.intensity > 0.7 { 120_000 } else { 60_000 };
        let aim = if matches!(mood.primary_mood.as_str(), "frustrated" | "stressed") {
            "counterbalance"
        } else {
            "support"
        };

        MusicSuggestion {
            prompt: prompt.to_string(),
            duration_ms,
            mood: mood.primary_mood.clone(),
            reasoning: format!(
                "Detected {} mood (intensity: {:.1}, confidence: {:.1}) during {}. Suggesting music to {} current state.",
                mood.primary_mood, mood.intensity, mood.confidence, activity, aim
            ),
        }
    }

    /// Typical listening length for an activity.
    pub fn duration_for_activity(&self, activity: &str) -> u64 {
        match activity {
            "coding" | "studying" | "relaxing" => 120_000,
            "writing" => 90_000,
            "exercising" => 180_000,
            _ => 60_000,
        }
    }

    /// Short explanation of a suggestion, scaled by detection confidence.
    pub fn explain_suggestion(
        &self,
        mood: &str,
        activity: &str,
        mood_confidence: f64,
        activity_confidence: f64,
        time_of_day: Option<&str>,
        personalized: bool,
    ) -> String {
        let mut parts = Vec::with_capacity(4);

        parts.push(if mood_confidence > 0.7 {
            format!("Detected strong {} mood", mood)
        } else if mood_confidence > 0.4 {
            format!("Detected {} mood", mood)
        } else {
            format!("Uncertain mood (guessing {})", mood)
        });

        parts.push(if activity_confidence > 0.7 {
            format!("clearly doing {}", activity)
        } else if activity_confidence > 0.4 {
            format!("possibly {}", activity)
        } else {
            format!("activity unclear (guessing {})", activity)
        });

        if let Some(time) = time_of_day {
            parts.push(format!("during {}", time));
        }
        if personalized {
            parts.push("considering your past preferences".to_string());
        }

        format!("{}.", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ContextAnalyzer {
        ContextAnalyzer::new()
    }

    #[test]
    fn test_frustration_detected() {
        let mood = analyzer().analyze_mood("Ugh, this is broken and not working!");
        assert_eq!(mood.primary_mood, "frustrated");
        assert_eq!(mood.intensity, 1.0);
        assert!((mood.confidence - 0.95).abs() < 1e-9);
        assert_eq!(mood.indicators, vec!["ugh", "broken", "not working"]);
        assert_eq!(
            mood.reasoning,
            "Detected 'frustrated' mood based on keywords: ugh, broken, not working"
        );
    }

    #[test]
    fn test_neutral_when_no_keywords() {
        let mood = analyzer().analyze_mood("The weather report for Tuesday");
        assert_eq!(mood.primary_mood, "neutral");
        assert_eq!(mood.intensity, 0.5);
        assert_eq!(mood.confidence, 0.3);
        assert!(mood.indicators.is_empty());
    }

    #[test]
    fn test_single_keyword_scores() {
        let mood = analyzer().analyze_mood("feeling tranquil");
        assert_eq!(mood.primary_mood, "calm");
        assert!((mood.intensity - 1.0 / 3.0).abs() < 1e-9);
        assert!((mood.confidence - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_tie_goes_to_earlier_mood() {
        // one stressed keyword, one calm keyword
        let mood = analyzer().analyze_mood("deadline but serene");
        assert_eq!(mood.primary_mood, "stressed");
    }

    #[test]
    fn test_detect_activity() {
        let a = analyzer();
        assert_eq!(a.detect_activity("debugging this python function"), ("coding", 0.7));
        assert_eq!(a.detect_activity("nothing here"), (UNKNOWN_ACTIVITY, 0.3));
    }

    #[test]
    fn test_conversation_uses_last_five_messages() {
        let messages: Vec<String> = ["I am so happy", "a", "b", "c", "d", "e"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let analysis = analyzer().analyze_conversation(&messages, None);
        assert_eq!(analysis.detected_mood, "neutral");

        let analysis = analyzer().analyze_conversation(&messages[..5], Some("writing"));
        assert_eq!(analysis.detected_mood, "happy");
        assert_eq!(analysis.detected_activity, "writing");
    }

    #[test]
    fn test_prompt_lookup_order() {
        let a = analyzer();
        assert_eq!(
            a.suggest_music_for_context("coding", "focused"),
            "lo-fi hip hop, steady beat, non-vocal, 85 BPM"
        );
        assert_eq!(
            a.suggest_music_for_context("gardening", "sad"),
            "gentle piano, comforting, reflective"
        );
        assert_eq!(a.suggest_music_for_context("gardening", "neutral"), FALLBACK_PROMPT);
    }

    #[test]
    fn test_music_params_duration_by_intensity() {
        let a = analyzer();
        let strong = a.analyze_mood("ugh broken error failed");
        let params = a.suggest_music_params(&strong, Some("coding"));
        assert_eq!(params.duration_ms, 120_000);
        assert!(params.reasoning.contains("counterbalance"));

        let mild = a.analyze_mood("happy");
        assert_eq!(a.suggest_music_params(&mild, None).duration_ms, 60_000);
    }

    #[test]
    fn test_explain_suggestion() {
        let text = analyzer().explain_suggestion("focused", "coding", 0.8, 1.0, Some("morning"), true);
        assert_eq!(
            text,
            "Detected strong focused mood; clearly doing coding; during morning; considering your past preferences."
        );
        let text = analyzer().explain_suggestion("neutral", "unknown", 0.3, 0.3, None, false);
        assert_eq!(text, "Uncertain mood (guessing neutral); activity unclear (guessing unknown).");
    }
}
