//! Central registration of all prompts.

use super::definitions::{MusicForActivityPrompt, PromptDefinition, RephraseRejectedPrompt};
use super::templates::PromptTemplate;

fn build_template<P: PromptDefinition>() -> PromptTemplate {
    PromptTemplate::new(
        P::NAME,
        Some(P::DESCRIPTION.to_string()),
        P::arguments(),
        P::template(),
    )
}

/// All registered prompts, in listing order.
pub fn get_all_prompts() -> Vec<PromptTemplate> {
    vec![
        build_template::<MusicForActivityPrompt>(),
        build_template::<RephraseRejectedPrompt>(),
    ]
}

pub fn prompt_names() -> Vec<&'static str> {
    vec![MusicForActivityPrompt::NAME, RephraseRejectedPrompt::NAME]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_names() {
        let prompts = get_all_prompts();
        let names: Vec<_> = prompts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, prompt_names());
        assert_eq!(names, vec!["music_for_activity", "rephrase_rejected_prompt"]);
    }
}
