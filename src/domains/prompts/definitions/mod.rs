//! Prompt definitions, one file per prompt.

mod music_for_activity;
mod rephrase_rejected;

pub use music_for_activity::MusicForActivityPrompt;
pub use rephrase_rejected::RephraseRejectedPrompt;

use rmcp::model::PromptArgument;

/// Metadata and template text for a prompt.
pub trait PromptDefinition {
    const NAME: &'static str;

    const DESCRIPTION: &'static str;

    /// The template string with `{{variable}}` placeholders.
    fn template() -> &'static str;

    fn arguments() -> Vec<PromptArgument>;
}
