//! Mood analysis tool definition.
//!
//! Reads mood and activity from free text and suggests what to generate,
//! blending in prompts the user liked before in the same situation.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::ServerContext;
use crate::domains::tools::definitions::common::{
    error_result, non_blank, parse_arguments, preview, structured_result,
};

const RECOMMENDATION_LIMIT: usize = 3;
const MAX_ALTERNATIVES: usize = 2;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the mood analysis tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalyzeMoodParams {
    /// Text to analyze: a conversation snippet, message or journal entry.
    pub context: String,

    /// Explicit activity such as "coding". Inferred from the text when omitted.
    #[serde(default)]
    pub activity: Option<String>,

    /// Time context such as "morning" or "evening".
    #[serde(default)]
    pub time_of_day: Option<String>,

    /// Recently generated prompts to leave out of the alternatives.
    #[serde(default)]
    pub recent_music: Option<Vec<String>>,
}

// ============================================================================
// Output Structure
// ============================================================================

#[derive(Debug, Serialize, JsonSchema)]
pub struct MoodSuggestionOutput {
    pub success: bool,
    pub suggested_prompt: String,
    pub suggested_duration_ms: u64,
    pub mood_detected: String,
    pub mood_intensity: f64,
    pub mood_indicators: Vec<String>,
    pub activity_detected: String,
    pub mood_confidence: f64,
    pub activity_confidence: f64,
    pub overall_confidence: f64,
    pub reasoning: String,
    /// Previously liked prompts for this mood and activity.
    pub alternative_prompts: Vec<String>,
    pub personalized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Mood analysis tool - suggests music parameters for a situation.
pub struct AnalyzeMoodForMusicTool;

impl AnalyzeMoodForMusicTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "analyze_mood_for_music";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Analyze text for mood and activity and suggest a music prompt and duration to match. Includes personalised alternatives from past liked generations when available.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(context = %preview(&params.context)))]
    pub async fn execute(params: &AnalyzeMoodParams, ctx: &ServerContext) -> CallToolResult {
        info!("Analyzing mood from context: '{}'", preview(&params.context));

        if params.context.trim().is_empty() {
            return error_result("Context cannot be empty");
        }

        let analyzer = &ctx.analyzer;
        let mood = analyzer.analyze_mood(&params.context);
        let (activity, activity_confidence) = match non_blank(&params.activity) {
            Some(activity) => (activity.to_string(), 1.0),
            None => {
                let (activity, confidence) = analyzer.detect_activity(&params.context);
                (activity.to_string(), confidence)
            }
        };
        info!(
            "Detected: mood={} ({:.2}), activity={} ({:.2})",
            mood.primary_mood, mood.confidence, activity, activity_confidence
        );

        let suggested_prompt = analyzer.suggest_music_for_context(&activity, &mood.primary_mood);

        let recommendations = if ctx.learning_enabled() {
            ctx.preferences.lock().await.get_recommendations(
                Some(&activity),
                Some(&mood.primary_mood),
                RECOMMENDATION_LIMIT,
            )
        } else {
            Vec::new()
        };
        let personalized = !recommendations.is_empty();

        let recent = params.recent_music.as_deref().unwrap_or_default();
        let alternative_prompts: Vec<String> = recommendations
            .into_iter()
            .filter(|prompt| !recent.contains(prompt))
            .take(MAX_ALTERNATIVES)
            .collect();

        let time_of_day = non_blank(&params.time_of_day).map(str::to_string);
        let reasoning = analyzer.explain_suggestion(
            &mood.primary_mood,
            &activity,
            mood.confidence,
            activity_confidence,
            time_of_day.as_deref(),
            personalized,
        );

        let summary = format!("Suggested prompt: '{}'. {}", suggested_prompt, reasoning);
        let output = MoodSuggestionOutput {
            success: true,
            suggested_prompt: suggested_prompt.to_string(),
            suggested_duration_ms: analyzer.duration_for_activity(&activity),
            overall_confidence: (mood.confidence + activity_confidence) / 2.0,
            mood_detected: mood.primary_mood,
            mood_intensity: mood.intensity,
            mood_indicators: mood.indicators,
            activity_detected: activity,
            mood_confidence: mood.confidence,
            activity_confidence,
            reasoning,
            alternative_prompts,
            personalized,
            time_of_day,
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

        let params: AnalyzeMoodParams = parse_http_arguments(arguments)?;
        info!("Mood analysis tool (HTTP) called");
        to_http_value(&Self::execute(&params, &ctx).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<AnalyzeMoodParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<MoodSuggestionOutput>().into()),
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
                let params: AnalyzeMoodParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
