//! Context analysis tools.

pub mod mood;

pub use mood::{AnalyzeMoodForMusicTool, AnalyzeMoodParams};
