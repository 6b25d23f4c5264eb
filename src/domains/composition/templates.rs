//! Built-in composition templates.

use serde::Serialize;

/// One section of a template, sized as a share of the total duration.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateSection {
    pub style: &'static str,
    pub share: f64,
    pub mood: &'static str,
}

/// A pre-built composition shape for a common listening scenario.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CompositionTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub overall_mood: &'static str,
    pub genre: &'static str,
    pub sections: &'static [TemplateSection],
    /// Prompt keywords that select this template.
    #[serde(skip)]
    pub keywords: &'static [&'static str],
}

const fn section(style: &'static str, share: f64, mood: &'static str) -> TemplateSection {
    TemplateSection { style, share, mood }
}

/// All templates, in detection priority order.
pub const TEMPLATES: &[CompositionTemplate] = &[
    CompositionTemplate {
        name: "focus_work",
        description: "Steady focus music for deep work",
        overall_mood: "focused",
        genre: "lo-fi",
        sections: &[
            section("ambient intro", 0.15, "calm"),
            section("steady lo-fi beat", 0.70, "focused"),
            section("gentle outro", 0.15, "calm"),
        ],
        keywords: &["focus", "coding", "work", "study", "concentration", "lo-fi"],
    },
    CompositionTemplate {
        name: "energetic_workout",
        description: "High-energy workout music",
        overall_mood: "energetic",
        genre: "electronic",
        sections: &[
            section("warm-up beat", 0.20, "building"),
            section("high energy driving rhythm", 0.60, "energetic"),
            section("cool-down", 0.20, "recovery"),
        ],
        keywords: &["workout", "exercise", "gym", "running", "energetic"],
    },
    CompositionTemplate {
        name: "calming_meditation",
        description: "Consistent calming atmosphere",
        overall_mood: "peaceful",
        genre: "ambient",
        sections: &[section("very slow ambient", 1.0, "peaceful")],
        keywords: &["meditation", "calm", "peaceful", "relaxing", "sleep"],
    },
    CompositionTemplate {
        name: "creative_flow",
        description: "Music to support creative thinking",
        overall_mood: "creative",
        genre: "ambient-electronic",
        sections: &[
            section("gentle uplifting intro", 0.25, "inspired"),
            section("flowing melodic middle", 0.50, "creative"),
            section("resolving outro", 0.25, "satisfied"),
        ],
        keywords: &["creative", "brainstorm", "inspire", "flow"],
    },
    CompositionTemplate {
        name: "dramatic_build",
        description: "Dramatic arc with tension and release",
        overall_mood: "dramatic",
        genre: "orchestral",
        sections: &[
            section("quiet beginning", 0.20, "anticipation"),
            section("building tension", 0.40, "rising"),
            section("powerful climax", 0.30, "peak"),
            section("resolution", 0.10, "resolved"),
        ],
        keywords: &["dramatic", "build", "climax", "epic", "cinematic"],
    },
];

/// Look up a template by name.
pub fn find_template(name: &str) -> Option<&'static CompositionTemplate> {
    TEMPLATES.iter().find(|t| t.name == name)
}

/// Names of all templates.
pub fn template_names() -> Vec<&'static str> {
    TEMPLATES.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_shares_sum_to_one() {
        for template in TEMPLATES {
            let total: f64 = template.sections.iter().map(|s| s.share).sum();
            assert!((total - 1.0).abs() < 1e-9, "{} sums to {}", template.name, total);
        }
    }

    #[test]
    fn test_find_template() {
        assert!(find_template("dramatic_build").is_some());
        assert!(find_template("polka_party").is_none());
        assert_eq!(template_names().len(), 5);
    }
}
