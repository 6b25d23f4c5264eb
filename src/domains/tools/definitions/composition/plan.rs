//! Composition plan tool definition.
//!
//! Builds a multi-section plan from a prompt, a named template or an
//! explicit mood progression, without calling the generation API.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::core::ServerContext;
use crate::domains::composition::{CompositionPlan, DEFAULT_TOTAL_MS, MoodProgression};
use crate::domains::tools::definitions::common::{
    error_result, non_blank, parse_arguments, preview, structured_result,
};

/// Section count for an explicit progression when none is given.
const DEFAULT_PROGRESSION_SECTIONS: usize = 3;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the composition plan tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateCompositionPlanParams {
    /// High-level description, e.g. "focus music for coding".
    pub prompt: String,

    /// Total length in milliseconds. Defaults to one minute.
    #[serde(default)]
    pub total_duration_ms: Option<u64>,

    /// Number of sections. Chosen from the duration when omitted.
    #[serde(default)]
    pub sections: Option<usize>,

    /// Mood flow such as "calm to energetic".
    #[serde(default)]
    pub mood_progression: Option<String>,

    /// Named template: focus_work, energetic_workout, calming_meditation,
    /// creative_flow or dramatic_build.
    #[serde(default)]
    pub template: Option<String>,
}

// ============================================================================
// Output Structure
// ============================================================================

#[derive(Debug, Serialize, JsonSchema)]
pub struct CompositionPlanOutput {
    pub success: bool,
    pub composition_plan: CompositionPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood_progression: Option<String>,
    pub total_duration_ms: u64,
    pub sections_count: usize,
    pub reasoning: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Composition plan tool - plans a piece before it is generated.
pub struct CreateCompositionPlanTool;

impl CreateCompositionPlanTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "create_composition_plan";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Create a structured multi-section composition plan from a description, a named template or a mood progression (e.g. 'calm to energetic'). Pass the returned plan to generate_music_structured.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(prompt = %preview(&params.prompt)))]
    pub fn execute(params: &CreateCompositionPlanParams, ctx: &ServerContext) -> CallToolResult {
        info!("Creating composition plan: '{}'", preview(&params.prompt));

        let total_ms = params.total_duration_ms.unwrap_or(DEFAULT_TOTAL_MS);
        if let Err(message) = ctx.config.check_duration(total_ms) {
            return error_result(message);
        }
        let planner = &ctx.planner;

        if let Some(name) = non_blank(&params.template) {
            return match planner.from_template(name, Some(total_ms)) {
                Ok(plan) => {
                    let reasoning = planner.explain(&plan, Some(name));
                    Self::respond(plan, Some(name.to_string()), None, reasoning)
                }
                Err(e) => error_result(e.to_string()),
            };
        }

        if let Some(text) = non_blank(&params.mood_progression) {
            match MoodProgression::parse(text) {
                Some(progression) => {
                    let sections = params.sections.unwrap_or(DEFAULT_PROGRESSION_SECTIONS);
                    return match planner.progressive_plan(
                        &progression.start,
                        &progression.end,
                        total_ms,
                        sections,
                    ) {
                        Ok(plan) => {
                            let reasoning = format!(
                                "Created progressive plan from {} to {}",
                                progression.start, progression.end
                            );
                            Self::respond(plan, None, Some(text.to_string()), reasoning)
                        }
                        Err(e) => error_result(e.to_string()),
                    };
                }
                None => warn!(
                    "Could not parse mood progression '{}', planning from prompt",
                    text
                ),
            }
        }

        let template_used = planner.detect_template(&params.prompt).map(str::to_string);
        match planner.plan_from_prompt(&params.prompt, total_ms, params.sections) {
            Ok(plan) => {
                let reasoning = planner.explain(&plan, template_used.as_deref());
                Self::respond(plan, template_used, None, reasoning)
            }
            Err(e) => error_result(e.to_string()),
        }
    }

    fn respond(
        plan: CompositionPlan,
        template_used: Option<String>,
        mood_progression: Option<String>,
        reasoning: String,
    ) -> CallToolResult {
        let summary = format!("{}. Total {}ms.", reasoning, plan.total_duration_ms);
        let output = CompositionPlanOutput {
            success: true,
            total_duration_ms: plan.total_duration_ms,
            sections_count: plan.sections.len(),
            composition_plan: plan,
            template_used,
            mood_progression,
            reasoning,
        };
        structured_result(summary, &output)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: Arc<ServerContext>,
    ) -> Result<serde_json::Value, String> {
        use crate::domains::tools::definitions::common::{parse_http_arguments, to_http_value};

        let params: CreateCompositionPlanParams = parse_http_arguments(arguments)?;
        info!("Composition plan tool (HTTP) called");
        to_http_value(&Self::execute(&params, &ctx))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<CreateCompositionPlanParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<CompositionPlanOutput>().into()),
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(ctx: Arc<ServerContext>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let args = call.arguments.clone();
            let ctx = ctx.clone();
            async move {
                let params: CreateCompositionPlanParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx))
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::testing::{FakeComposer, test_context};

    fn params(prompt: &str) -> CreateCompositionPlanParams {
        CreateCompositionPlanParams {
            prompt: prompt.to_string(),
            total_duration_ms: None,
            sections: None,
            mood_progression: None,
            template: None,
        }
    }

    fn ctx() -> (tempfile::TempDir, Arc<ServerContext>) {
        test_context(Arc::new(FakeComposer::succeeding()))
    }

    #[test]
    fn test_template_detected_from_prompt() {
        let (_dir, ctx) = ctx();
        let result = CreateCompositionPlanTool::execute(&params("deep focus work session"), &ctx);
        assert_eq!(result.is_error, Some(false));
        let output = result.structured_content.unwrap();
        assert_eq!(output["template_used"], "focus_work");
        assert_eq!(output["total_duration_ms"], 60_000);
        assert!(output["reasoning"].as_str().unwrap().contains("focus_work"));
    }

    #[test]
    fn test_explicit_mood_progression() {
        let (_dir, ctx) = ctx();
        let mut p = params("soundtrack for my morning");
        p.mood_progression = Some("calm to energetic".to_string());
        p.sections = Some(4);
        p.total_duration_ms = Some(120_000);

        let output = CreateCompositionPlanTool::execute(&p, &ctx)
            .structured_content
            .unwrap();
        assert_eq!(output["sections_count"], 4);
        assert_eq!(output["mood_progression"], "calm to energetic");
        assert_eq!(output["composition_plan"]["overall_mood"], "calm_to_energetic");
        assert!(output.get("template_used").is_none());
    }

    #[test]
    fn test_named_template_and_unknown_template() {
        let (_dir, ctx) = ctx();
        let mut p = params("anything");
        p.template = Some("dramatic_build".to_string());
        let output = CreateCompositionPlanTool::execute(&p, &ctx)
            .structured_content
            .unwrap();
        assert_eq!(output["template_used"], "dramatic_build");

        p.template = Some("polka_party".to_string());
        let result = CreateCompositionPlanTool::execute(&p, &ctx);
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_zero_sections_rejected() {
        let (_dir, ctx) = ctx();
        let mut p = params("gentle rain");
        p.sections = Some(0);
        assert_eq!(CreateCompositionPlanTool::execute(&p, &ctx).is_error, Some(true));
    }

    #[test]
    fn test_duration_bounds_checked() {
        let (_dir, ctx) = ctx();
        let mut p = params("gentle rain");
        p.total_duration_ms = Some(999_999);
        assert_eq!(CreateCompositionPlanTool::execute(&p, &ctx).is_error, Some(true));
    }
}
