//! Keyword and prompt tables for context detection.
//!
//! Table order matters: when two entries score the same, the earlier one
//! wins.

pub(super) type KeywordTable = &'static [(&'static str, &'static [&'static str])];

pub(super) const MOOD_KEYWORDS: KeywordTable = &[
    (
        "frustrated",
        &[
            "fuck", "damn", "ugh", "shit", "broken", "not working", "frustrated", "annoyed",
            "angry", "hate this", "stupid", "doesn't work", "error", "failed", "wrong",
        ],
    ),
    (
        "stressed",
        &[
            "stressed", "overwhelmed", "too much", "deadline", "pressure", "anxious", "worried",
            "panic", "rush", "urgent",
        ],
    ),
    (
        "focused",
        &[
            "working on", "coding", "analyzing", "building", "implementing", "focus",
            "concentrating", "deep work", "debugging",
        ],
    ),
    (
        "creative",
        &[
            "brainstorm", "idea", "creative", "design", "imagine", "thinking about", "exploring",
            "inspiration", "innovate",
        ],
    ),
    (
        "happy",
        &[
            "happy", "excited", "great", "awesome", "love", "amazing", "celebrate", "success",
            "yay", "finally", "yes!",
        ],
    ),
    (
        "tired",
        &[
            "tired", "exhausted", "sleepy", "fatigued", "drained", "can't focus", "need break",
            "worn out",
        ],
    ),
    (
        "calm",
        &[
            "calm", "peaceful", "relaxed", "chilling", "quiet", "meditative", "serene", "tranquil",
        ],
    ),
    (
        "sad",
        &[
            "sad", "down", "depressed", "lonely", "hurt", "disappointed", "upset", "crying", "miss",
        ],
    ),
    (
        "motivated",
        &[
            "motivated", "determined", "ready", "let's go", "pumped", "energized", "committed",
            "focused on goal",
        ],
    ),
];

pub(super) const ACTIVITY_KEYWORDS: KeywordTable = &[
    (
        "coding",
        &[
            "code", "coding", "programming", "debug", "implement", "function", "bug", "compile",
            "python", "javascript",
        ],
    ),
    (
        "writing",
        &["writing", "blog", "article", "document", "draft", "essay", "email", "report"],
    ),
    (
        "brainstorming",
        &["brainstorm", "ideas", "thinking", "planning", "strategy", "design", "concept"],
    ),
    (
        "studying",
        &["study", "learning", "reading", "research", "exam", "homework", "assignment", "course"],
    ),
    (
        "exercising",
        &["workout", "exercise", "gym", "running", "training", "cardio", "strength", "yoga"],
    ),
    ("meeting", &["meeting", "call", "presentation", "discussion", "conference"]),
    ("relaxing", &["relax", "chill", "unwind", "rest", "break", "meditate"]),
    ("creating", &["create", "build", "make", "design", "craft", "produce"]),
];

/// Prompts for specific (mood, activity) pairs.
pub(super) const CONTEXT_PROMPTS: &[((&str, &str), &str)] = &[
    (("frustrated", "coding"), "calming ambient with gentle rhythm, non-distracting, 70 BPM"),
    (("frustrated", "writing"), "peaceful piano, flowing, meditative, stress relief"),
    (("stressed", "coding"), "gentle lo-fi beats, calming, steady, 65 BPM"),
    (("stressed", "studying"), "ambient soundscape, peaceful, concentration aid"),
    (("focused", "coding"), "lo-fi hip hop, steady beat, non-vocal, 85 BPM"),
    (("focused", "writing"), "minimal piano, ambient textures, calm"),
    (("focused", "studying"), "classical study music, baroque, gentle"),
    (("creative", "brainstorming"), "uplifting ambient, inspiring, flowing melodies"),
    (("creative", "creating"), "atmospheric electronic, dreamy, evolving"),
    (("creative", "writing"), "gentle jazz, inspiring, fluid"),
    (("motivated", "coding"), "upbeat electronic, driving beat, energizing, 110 BPM"),
    (("motivated", "exercising"), "high energy electronic, powerful bass, 128 BPM"),
    (("happy", "creating"), "uplifting indie, cheerful, positive energy"),
    (("tired", "coding"), "gentle beats, coffee shop ambiance, warm"),
    (("tired", "studying"), "soft piano, soothing, focus support"),
    (("calm", "relaxing"), "ambient soundscape, nature sounds, peaceful"),
    (("calm", "studying"), "minimal piano, serene, non-distracting"),
];

/// Prompts keyed by mood alone.
pub(super) const MOOD_PROMPTS: &[(&str, &str)] = &[
    ("frustrated", "calming piano and strings, peaceful, stress relief"),
    ("stressed", "ambient relaxation, gentle, soothing"),
    ("focused", "lo-fi study beats, concentration, steady rhythm"),
    ("creative", "inspiring ambient, flowing, uplifting"),
    ("happy", "upbeat indie, positive, cheerful melodies"),
    ("sad", "gentle piano, comforting, reflective"),
    ("tired", "soft ambient, relaxing, gentle energy"),
    ("motivated", "energizing electronic, driving beat, powerful"),
    ("calm", "peaceful ambient, serene, meditative"),
];

pub(super) const FALLBACK_PROMPT: &str = "lo-fi beats, steady rhythm, focus music";

/// Score every table entry against `text` and return the best one with its
/// matched keywords.
pub(super) fn best_match(table: KeywordTable, text: &str) -> Option<(&'static str, Vec<&'static str>)> {
    let mut best: Option<(&'static str, Vec<&'static str>)> = None;
    for (label, keywords) in table {
        let matched: Vec<&'static str> = keywords.iter().copied().filter(|k| text.contains(k)).collect();
        if matched.is_empty() {
            continue;
        }
        let better = best.as_ref().is_none_or(|(_, current)| matched.len() > current.len());
        if better {
            best = Some((label, matched));
        }
    }
    best
}
