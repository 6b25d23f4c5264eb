//! Simple generation tool definition.
//!
//! Generates a track from a free-text prompt and saves it to the library.

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
use crate::domains::generation::GenerationResult;
use crate::domains::tools::definitions::common::{
    error_result, parse_arguments, preview, structured_result,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the simple generation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GenerateSimpleParams {
    /// Natural language description of the music,
    /// e.g. "lo-fi hip hop beats for coding, 90 BPM".
    pub prompt: String,

    /// Length in milliseconds (3000-300000). Defaults to one minute.
    #[serde(default)]
    pub duration_ms: Option<u64>,

    /// Audio format tag, e.g. "mp3_44100_128".
    #[serde(default)]
    pub output_format: Option<String>,

    /// Extra metadata stored with the track. `activity`, `mood` and
    /// `context` keys also tag the recorded preference.
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

// ============================================================================
// Output Structure
// ============================================================================

/// Result of a successful generation.
#[derive(Debug, Serialize, JsonSchema)]
pub struct GenerateMusicOutput {
    pub success: bool,
    pub audio_path: String,
    pub metadata_path: String,
    pub file_size_bytes: usize,
    /// Plan reported by the API, or an empty object.
    pub composition_plan: Value,
    pub prompt: String,
    pub duration_ms: u64,
    pub message: String,
    /// Set when the preference could not be saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Simple generation tool - one prompt in, one saved track out.
pub struct GenerateMusicSimpleTool;

impl GenerateMusicSimpleTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "generate_music_simple";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Generate music from a natural language prompt. Saves the audio and a JSON metadata file to the music library and returns their paths. If the prompt is rejected for copyright reasons, a suggested replacement prompt is returned.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(prompt = %preview(&params.prompt)))]
    pub async fn execute(params: &GenerateSimpleParams, ctx: &ServerContext) -> CallToolResult {
        info!("Received music generation request: '{}'", preview(&params.prompt));

        if params.prompt.trim().is_empty() {
            return error_result("Prompt cannot be empty");
        }
        if let Some(duration_ms) = params.duration_ms {
            if let Err(message) = ctx.config.check_duration(duration_ms) {
                return error_result(message);
            }
        }

        let duration_ms = params
            .duration_ms
            .unwrap_or(ctx.config.generation.default_duration_ms);
        let output_format = params
            .output_format
            .clone()
            .unwrap_or_else(|| ctx.config.generation.default_output_format.clone());

        let outcome = ctx
            .composer
            .generate_simple(&params.prompt, Some(duration_ms), &output_format)
            .await;
        let (audio, composition_plan) = match outcome {
            GenerationResult::Success {
                audio,
                composition_plan,
                ..
            } => (audio, composition_plan.unwrap_or_else(|| json!({}))),
            failure => return generation_failure(&failure, "Try this instead"),
        };

        let mut metadata = params.metadata.clone().unwrap_or_default();
        metadata.insert("prompt".to_string(), json!(params.prompt));
        metadata.insert("duration_ms".to_string(), json!(duration_ms));
        metadata.insert("composition_plan".to_string(), composition_plan.clone());
        metadata.insert("output_format".to_string(), json!(output_format));
        metadata.insert("generated_at".to_string(), json!(Local::now().to_rfc3339()));

        let saved = match save_track(
            ctx,
            audio,
            metadata.clone(),
            params.prompt.clone(),
            output_format,
        )
        .await
        {
            Ok(saved) => saved,
            Err(e) => return error_result(format!("Failed to save generated music: {}", e)),
        };
        info!("Music saved successfully: {}", saved.audio_path.display());

        let warning = remember_generation(ctx, &params.prompt, &metadata, &saved.audio_path).await;

        let message = format!("Successfully generated music: {}", saved.file_name());
        let output = GenerateMusicOutput {
            success: true,
            audio_path: saved.audio_path.display().to_string(),
            metadata_path: saved.metadata_path.display().to_string(),
            file_size_bytes: saved.file_size_bytes,
            composition_plan,
            prompt: params.prompt.clone(),
            duration_ms,
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

        let params: GenerateSimpleParams = parse_http_arguments(arguments)?;
        info!("Generate tool (HTTP) called");
        to_http_value(&Self::execute(&params, &ctx).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<GenerateSimpleParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<GenerateMusicOutput>().into()),
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
                let params: GenerateSimpleParams = parse_arguments(args)?;
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
    use crate::domains::tools::definitions::testing::{FakeComposer, test_context};
    use std::fs;

    fn params(prompt: &str) -> GenerateSimpleParams {
        GenerateSimpleParams {
            prompt: prompt.to_string(),
            duration_ms: None,
            output_format: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn test_generate_saves_and_records() {
        let composer = Arc::new(FakeComposer::succeeding());
        let (_dir, ctx) = test_context(composer.clone());

        let mut p = params("lo-fi beats for coding");
        let mut metadata = Map::new();
        metadata.insert("activity".to_string(), json!("coding"));
        p.metadata = Some(metadata);

        let result = GenerateMusicSimpleTool::execute(&p, &ctx).await;
        assert_eq!(result.is_error, Some(false));

        let output = result.structured_content.unwrap();
        let audio_path = output["audio_path"].as_str().unwrap();
        assert!(audio_path.ends_with("_lo_fi_beats_for_coding_001.mp3"));
        assert_eq!(fs::read(audio_path).unwrap(), b"ID3fake-audio");
        assert_eq!(output["duration_ms"], 60_000);
        assert_eq!(output["composition_plan"], json!({}));

        let metadata: Value =
            serde_json::from_slice(&fs::read(output["metadata_path"].as_str().unwrap()).unwrap()).unwrap();
        assert_eq!(metadata["activity"], "coding");
        assert_eq!(metadata["output_format"], "mp3_44100_128");

        let store = ctx.preferences.lock().await;
        assert_eq!(store.len(), 1);
        assert!(store.records()[0].liked);
        assert_eq!(store.records()[0].activity.as_deref(), Some("coding"));
        assert_eq!(composer.prompts.lock().unwrap().as_slice(), ["lo-fi beats for coding"]);
    }

    #[tokio::test]
    async fn test_duration_out_of_range_rejected_before_generation() {
        let composer = Arc::new(FakeComposer::succeeding());
        let (_dir, ctx) = test_context(composer.clone());

        let mut p = params("tiny jingle");
        p.duration_ms = Some(1_000);
        let result = GenerateMusicSimpleTool::execute(&p, &ctx).await;
        assert_eq!(result.is_error, Some(true));

        p.duration_ms = Some(400_000);
        let result = GenerateMusicSimpleTool::execute(&p, &ctx).await;
        assert_eq!(result.is_error, Some(true));

        assert!(composer.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_copyright_rejection_returns_suggestion_and_records_nothing() {
        let composer = Arc::new(FakeComposer::returning(GenerationResult::CopyrightRejected {
            message: "Copyright detected: references an existing song".to_string(),
            suggested_prompt: Some("melancholic piano ballad".to_string()),
        }));
        let (dir, ctx) = test_context(composer);

        let result = GenerateMusicSimpleTool::execute(&params("play that famous song"), &ctx).await;
        assert_eq!(result.is_error, Some(true));
        let details = result.structured_content.unwrap();
        assert_eq!(details["suggested_prompt"], "melancholic piano ballad");
        assert!(ctx.preferences.lock().await.is_empty());
        assert!(!dir.path().join("music").exists());
    }

    #[tokio::test]
    async fn test_blank_prompt_rejected() {
        let (_dir, ctx) = test_context(Arc::new(FakeComposer::succeeding()));
        let result = GenerateMusicSimpleTool::execute(&params("   "), &ctx).await;
        assert_eq!(result.is_error, Some(true));
    }

    #[tokio::test]
    async fn test_learning_disabled_skips_recording() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = crate::domains::tools::definitions::testing::temp_config(&dir);
        config.features.preference_learning = false;
        let ctx = ServerContext::with_composer(config, Arc::new(FakeComposer::succeeding()));

        let result = GenerateMusicSimpleTool::execute(&params("rain"), &ctx).await;
        assert_eq!(result.is_error, Some(false));
        assert!(ctx.preferences.lock().await.is_empty());
    }

    #[test]
    fn test_tool_metadata() {
        let tool = GenerateMusicSimpleTool::to_tool();
        assert_eq!(tool.name, "generate_music_simple");
        assert!(tool.output_schema.is_some());
    }
}
