//! Prompt template rendering.
//!
//! Templates use a small `{{variable}}` syntax with optional blocks:
//! `{{#if name}}shown when set{{else}}shown otherwise{{/if}}`. Blocks do not
//! nest.

use rmcp::model::PromptArgument;
use std::collections::HashMap;

use super::error::PromptError;

const IF_OPEN: &str = "{{#if ";
const ELSE_TAG: &str = "{{else}}";
const IF_CLOSE: &str = "{{/if}}";

/// A prompt template that can be instantiated with arguments.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<PromptArgument>,
    /// Template text with `{{variable}}` placeholders.
    pub template: String,
}

impl PromptTemplate {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        arguments: Vec<PromptArgument>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            arguments,
            template: template.into(),
        }
    }

    /// Render the template.
    ///
    /// Blank argument values count as unset. Placeholders for unset
    /// arguments render as nothing.
    pub fn render(&self, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
        let lookup = |name: &str| {
            arguments
                .get(name.trim())
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let expanded = expand_conditionals(&self.template, &lookup)?;
        substitute(&expanded, &lookup)
    }
}

fn expand_conditionals<'a>(
    template: &str,
    lookup: &impl Fn(&str) -> Option<&'a str>,
) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(IF_OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + IF_OPEN.len()..];

        let name_end = after_open
            .find("}}")
            .ok_or_else(|| PromptError::template("Unclosed {{#if}} tag"))?;
        let name = &after_open[..name_end];
        let body_and_rest = &after_open[name_end + 2..];

        let close = body_and_rest
            .find(IF_CLOSE)
            .ok_or_else(|| PromptError::template(format!("Missing {{{{/if}}}} for '{}'", name.trim())))?;
        let body = &body_and_rest[..close];
        if body.contains(IF_OPEN) {
            return Err(PromptError::template("Nested {{#if}} blocks are not supported"));
        }

        let (when_set, otherwise) = body.split_once(ELSE_TAG).unwrap_or((body, ""));
        out.push_str(if lookup(name).is_some() { when_set } else { otherwise });

        rest = &body_and_rest[close + IF_CLOSE.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

fn substitute<'a>(
    template: &str,
    lookup: &impl Fn(&str) -> Option<&'a str>,
) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| PromptError::template("Unclosed placeholder"))?;
        let name = &after[..end];
        if name.starts_with('#') || name.starts_with('/') || name == "else" {
            return Err(PromptError::template(format!("Unexpected tag '{{{{{}}}}}'", name)));
        }
        out.push_str(lookup(name).unwrap_or_default());
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Build a prompt argument description.
pub fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}
