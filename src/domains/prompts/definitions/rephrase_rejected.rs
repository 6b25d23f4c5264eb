//! Prompt for rewriting a generation prompt the API refused.

use super::PromptDefinition;
use crate::domains::prompts::templates::argument;
use rmcp::model::PromptArgument;

pub struct RephraseRejectedPrompt;

impl PromptDefinition for RephraseRejectedPrompt {
    const NAME: &'static str = "rephrase_rejected_prompt";
    const DESCRIPTION: &'static str =
        "Rewrite a music prompt that was rejected for referencing copyrighted material";

    fn template() -> &'static str {
        "The music prompt \"{{original_prompt}}\" was rejected because it refers to copyrighted \
material such as an artist, a band or a song.\n\n\
{{#if suggested_prompt}}The service suggested this alternative: \"{{suggested_prompt}}\". \
Start from that suggestion and keep whatever it preserves of my intent.\
{{else}}Write an alternative that keeps the intent of the original.{{/if}}\n\n\
Describe the music by genre, era, instrumentation, tempo and mood instead of naming people \
or titles. Show me the new prompt, then call generate_music_simple with it."
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            argument("original_prompt", "The prompt that was rejected", true),
            argument(
                "suggested_prompt",
                "The replacement prompt returned with the rejection, if any",
                false,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::prompts::templates::PromptTemplate;
    use std::collections::HashMap;

    fn render(pairs: &[(&str, &str)]) -> String {
        let args: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PromptTemplate::new(
            RephraseRejectedPrompt::NAME,
            None,
            RephraseRejectedPrompt::arguments(),
            RephraseRejectedPrompt::template(),
        )
        .render(&args)
        .unwrap()
    }

    #[test]
    fn test_uses_suggestion_when_present() {
        let text = render(&[
            ("original_prompt", "a song like Taylor Swift"),
            ("suggested_prompt", "upbeat country pop with acoustic guitar"),
        ]);
        assert!(text.contains("\"a song like Taylor Swift\""));
        assert!(text.contains("upbeat country pop with acoustic guitar"));
        assert!(!text.contains("Write an alternative"));
    }

    #[test]
    fn test_asks_for_rewrite_without_suggestion() {
        let text = render(&[("original_prompt", "Beatles style")]);
        assert!(text.contains("Write an alternative"));
        assert!(!text.contains("suggested this alternative"));
    }
}
