//! Structured generation tool definition.
//!
//! Generates a multi-section track from a composition plan, usually one
//! produced by `create_composition_plan`.

use chrono::Local;
use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{generation_failure, remember_generation, save_track};
use crate::core::ServerContext;
use crate::domains::composition::CompositionPlan;
use crate::domains::generation::GenerationResult;
use crate::domains::tools::definitions::common::{error_result, parse_arguments, structured_result};

/// Filename stem used when a plan has no usable section style.
const FALLBACK_STEM: &str = "structured_music";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the structured generation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateStructuredParams {
    /// Composition plan with a non-empty `sections` list.
    pub composition_plan: CompositionPlan,

    /// Ask the API to keep each section at exactly its planned length.
    #[serde(default)]
    pub strict_duration: bool,

    /// Audio format tag, e.g. "mp3_44100_128".
    #[serde(default)]
    pub output_format: Option<String>,

    /// Extra metadata stored with the track.
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

// ============================================================================
// Output Structure
// ============================================================================

/// Result of a successful structured generation.
#[derive(Debug, Serialize, JsonSchema)]
pub struct GenerateStructuredOutput {
    pub success: bool,
    pub audio_path: String,
    pub metadata_path: String,
    pub file_size_bytes: usize,
    pub sections_generated: usize,
    pub total_duration_ms: u64,
    pub composition_plan: CompositionPlan,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Structured generation tool - composition plan in, one saved track out.
pub struct GenerateMusicStructuredTool;

impl GenerateMusicStructuredTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "generate_music_structured";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Generate music from a multi-section composition plan (see create_composition_plan). Each section has a style, mood and duration; the plan is validated before it is sent. Saves audio and metadata to the music library.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(sections = params.composition_plan.sections.len()))]
    pub async fn execute(params: &GenerateStructuredParams, ctx: &ServerContext) -> CallToolResult {
        info!("Generating structured music from composition plan");

        let mut plan = params.composition_plan.clone();
        if plan.sections.is_empty() {
            return error_result("Composition plan has no sections");
        }
        if plan.total_duration_ms == 0 {
            plan.total_duration_ms = plan.sections_duration_ms();
        }
        if let Err(reason) = plan.validate() {
            return error_result(format!("Invalid composition_plan: {}", reason));
        }

        let output_format = params
            .output_format
            .clone()
            .unwrap_or_else(|| ctx.config.generation.default_output_format.clone());

        let outcome = ctx
            .composer
            .generate_structured(&plan, params.strict_duration, &output_format)
            .await;
        let (audio, total_duration_ms) = match outcome {
            GenerationResult::Success {
                audio, duration_ms, ..
            } => (audio, duration_ms.unwrap_or_else(|| plan.sections_duration_ms())),
            failure => return generation_failure(&failure, "Adjust your composition plan, e.g."),
        };

        let stem = plan
            .lead_style()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_STEM);
        let filename_prompt = format!("{} (structured)", stem);

        let mut metadata = params.metadata.clone().unwrap_or_default();
        metadata.insert("composition_plan".to_string(), json!(plan));
        metadata.insert("sections_count".to_string(), json!(plan.sections.len()));
        metadata.insert("total_duration_ms".to_string(), json!(total_duration_ms));
        metadata.insert("duration_ms".to_string(), json!(total_duration_ms));
        metadata.insert("strict_duration".to_string(), json!(params.strict_duration));
        metadata.insert("output_format".to_string(), json!(output_format));
        metadata.insert("generated_at".to_string(), json!(Local::now().to_rfc3339()));
        metadata.insert("generation_type".to_string(), json!("structured"));
        metadata
            .entry("mood".to_string())
            .or_insert_with(|| json!(plan.overall_mood));

        let saved = match save_track(
            ctx,
            audio,
            metadata.clone(),
            filename_prompt.clone(),
            output_format,
        )
        .await
        {
            Ok(saved) => saved,
            Err(e) => return error_result(format!("Failed to save generated music: {}", e)),
        };
        info!("Structured music saved: {}", saved.audio_path.display());

        let warning = remember_generation(ctx, &filename_prompt, &metadata, &saved.audio_path).await;

        let message = format!(
            "Successfully generated {}-section composition: {}",
            plan.sections.len(),
            saved.file_name()
        );
        let output = GenerateStructuredOutput {
            success: true,
            audio_path: saved.audio_path.display().to_string(),
            metadata_path: saved.metadata_path.display().to_string(),
            file_size_bytes: saved.file_size_bytes,
            sections_generated: plan.sections.len(),
            total_duration_ms,
            composition_plan: plan,
            message: message.clone(),
            warning,
        };
        structured_result(message, &output)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        ctx: Arc<ServerContext>,
    ) -> Result<Value, String> {
        use crate::domains::tools::definitions::common::{parse_http_arguments, to_http_value};

        let params: GenerateStructuredParams = parse_http_arguments(arguments)?;
        info!("Structured generate tool (HTTP) called");
        to_http_value(&Self::execute(&params, &ctx).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GenerateStructuredParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<GenerateStructuredOutput>().into()),
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
                let params: GenerateStructuredParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx).await)
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
    use crate::domains::composition::Section;
    use crate::domains::tools::definitions::testing::{FakeComposer, test_context};

    fn plan() -> CompositionPlan {
        CompositionPlan {
            sections: vec![
                Section::new("soft piano intro", 20_000, "calm"),
                Section::new("driving drums", 40_000, "energetic"),
            ],
            total_duration_ms: 60_000,
            overall_mood: "calm_to_energetic".to_string(),
            genre: None,
        }
    }

    fn params(plan: CompositionPlan) -> GenerateStructuredParams {
        GenerateStructuredParams {
            composition_plan: plan,
            strict_duration: false,
            output_format: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_structured_generation_saves_and_records() {
        let composer = Arc::new(FakeComposer::returning(GenerationResult::Success {
            audio: b"audio".to_vec(),
            composition_plan: None,
            duration_ms: Some(60_000),
        }));
        let (_dir, ctx) = test_context(composer.clone());

        let result = GenerateMusicStructuredTool::execute(&params(plan()), &ctx).await;
        assert_eq!(result.is_error, Some(false));

        let output = result.structured_content.unwrap();
        assert_eq!(output["sections_generated"], 2);
        assert_eq!(output["total_duration_ms"], 60_000);
        assert!(
            output["audio_path"]
                .as_str()
                .unwrap()
                .ends_with("_soft_piano_intro_structured_001.mp3")
        );

        let store = ctx.preferences.lock().await;
        assert_eq!(store.records()[0].prompt, "soft piano intro (structured)");
        assert_eq!(store.records()[0].mood.as_deref(), Some("calm_to_energetic"));
        assert_eq!(composer.plans.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_plan_rejected() {
        let composer = Arc::new(FakeComposer::succeeding());
        let (_dir, ctx) = test_context(composer.clone());
        let mut empty = plan();
        empty.sections.clear();

        let result = GenerateMusicStructuredTool::execute(&params(empty), &ctx).await;
        assert_eq!(result.is_error, Some(true));
        assert!(composer.plans.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_total_is_filled_from_sections() {
        let composer = Arc::new(FakeComposer::succeeding());
        let (_dir, ctx) = test_context(composer.clone());
        let mut p = plan();
        p.total_duration_ms = 0;

        let result = GenerateMusicStructuredTool::execute(&params(p), &ctx).await;
        assert_eq!(result.is_error, Some(false));
        assert_eq!(composer.plans.lock().unwrap()[0].total_duration_ms, 60_000);
    }

    #[tokio::test]
    async fn test_mismatched_plan_rejected() {
        let composer = Arc::new(FakeComposer::succeeding());
        let (_dir, ctx) = test_context(composer);
        let mut p = plan();
        p.total_duration_ms = 90_000;

        let result = GenerateMusicStructuredTool::execute(&params(p), &ctx).await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_rate_limited_is_reported() {
        let composer = Arc::new(FakeComposer::returning(GenerationResult::RateLimited {
            message: "API rate limit exceeded after 3 attempts. Please try again later.".to_string(),
        }));
        let (_dir, ctx) = test_context(composer);

        let result = GenerateMusicStructuredTool::execute(&params(plan()), &ctx).await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(result.structured_content.unwrap()["error_type"], "rate_limited");
    }

    #[test]
    fn test_plan_accepts_prompt_alias() {
        let params: GenerateStructuredParams = serde_json::from_value(json!({
            "composition_plan": {
                "sections": [{ "prompt": "ambient pads", "duration_ms": 30000, "mood": "calm" }],
                "total_duration_ms": 30000
            }
        }))
        .unwrap();
        assert_eq!(params.composition_plan.sections[0].style, "ambient pads");
        assert!(!params.strict_duration);
    }
}
