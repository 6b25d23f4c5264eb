//! Prompt listing and rendering.

use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};
use std::collections::HashMap;
use tracing::{debug, info};

use super::error::PromptError;
use super::registry::get_all_prompts;
use super::templates::PromptTemplate;

/// Serves the registered prompt templates.
pub struct PromptService {
    prompts: Vec<PromptTemplate>,
}

impl PromptService {
    pub fn new() -> Self {
        let prompts = get_all_prompts();
        info!("Registered {} prompts", prompts.len());
        Self { prompts }
    }

    pub fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts
            .iter()
            .map(|template| Prompt {
                name: template.name.clone(),
                title: None,
                description: template.description.clone(),
                arguments: Some(template.arguments.clone()),
                icons: None,
                meta: None,
            })
            .collect()
    }

    /// Render a prompt with the given arguments.
    ///
    /// Required arguments must be present and non-blank.
    pub fn get_prompt(
        &self,
        name: &str,
        arguments: Option<HashMap<String, String>>,
    ) -> Result<GetPromptResult, PromptError> {
        let template = self
            .prompts
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| PromptError::not_found(name))?;

        let arguments = arguments.unwrap_or_default();
        for arg in &template.arguments {
            let provided = arguments
                .get(&arg.name)
                .is_some_and(|v| !v.trim().is_empty());
            if arg.required.unwrap_or(false) && !provided {
                return Err(PromptError::missing_argument(&arg.name));
            }
        }

        debug!(prompt = name, "Rendering prompt");
        let content = template.render(&arguments)?;

        Ok(GetPromptResult {
            description: template.description.clone(),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, content)],
        })
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}
