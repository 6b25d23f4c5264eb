//! Context domain module.
//!
//! Keyword-based detection of the user's mood and activity from
//! conversational text, and the mapping from that context to a music prompt.

mod analyzer;
mod keywords;

pub use analyzer::{ContextAnalysis, ContextAnalyzer, MoodAnalysis, MusicSuggestion, UNKNOWN_ACTIVITY};
