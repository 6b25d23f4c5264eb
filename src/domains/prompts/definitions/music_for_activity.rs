//! Music-for-activity prompt definition.

use super::PromptDefinition;
use crate::domains::prompts::templates::argument;
use rmcp::model::PromptArgument;

/// Walks the model through picking and generating background music for
/// what the user is doing.
pub struct MusicForActivityPrompt;

impl PromptDefinition for MusicForActivityPrompt {
    const NAME: &'static str = "music_for_activity";
    const DESCRIPTION: &'static str =
        "Compose background music that fits an activity, optionally steered by a mood";

    fn template() -> &'static str {
        "I'm about to spend some time {{activity}}{{#if mood}} and I'm in a {{mood}} mood{{/if}}. \
Please compose some background music for it.\n\n\
First call get_music_recommendations with activity \"{{activity}}\" to see what I've liked before. \
Then call analyze_mood_for_music with context \"{{activity}}\"{{#if mood}} and mention that I feel {{mood}}{{/if}}, \
passing activity \"{{activity}}\". \
Pick the prompt that best matches my history{{#if mood}} and my {{mood}} mood{{/if}}, \
then call generate_music_simple with that prompt and the suggested duration.\n\n\
When the track is saved, tell me where to find it and ask whether I liked it so you can \
record the answer with record_music_feedback."
    }

    fn arguments() -> Vec<PromptArgument> {
        vec![
            argument(
                "activity",
                "What the music is for, for example coding, running or studying",
                true,
            ),
            argument("mood", "How the listener feels or wants to feel", false),
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
            MusicForActivityPrompt::NAME,
            None,
            MusicForActivityPrompt::arguments(),
            MusicForActivityPrompt::template(),
        )
        .render(&args)
        .unwrap()
    }

    #[test]
    fn test_metadata() {
        let args = MusicForActivityPrompt::arguments();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].name, "activity");
        assert_eq!(args[0].required, Some(true));
        assert_eq!(args[1].required, Some(false));
    }

    #[test]
    fn test_render_with_and_without_mood() {
        let text = render(&[("activity", "coding"), ("mood", "calm")]);
        assert!(text.starts_with("I'm about to spend some time coding and I'm in a calm mood."));
        assert!(text.contains("generate_music_simple"));

        let text = render(&[("activity", "running")]);
        assert!(text.starts_with("I'm about to spend some time running. "));
        assert!(!text.contains("mood."));
        assert!(!text.contains("{{"));
    }
}
