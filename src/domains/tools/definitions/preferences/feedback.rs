//! Feedback tool definition.
//!
//! Records explicit like/dislike/skip/replay feedback on a prompt.

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
use crate::domains::preferences::{FeedbackKind, PreferenceTags};
use crate::domains::tools::definitions::common::{
    error_result, non_blank, parse_arguments, preview, structured_result,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the feedback tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RecordFeedbackParams {
    /// Prompt the feedback is about.
    pub prompt: String,

    /// One of "like", "dislike", "skip" or "replay".
    pub feedback: String,

    /// Activity the music was played during.
    #[serde(default)]
    pub activity: Option<String>,

    /// Mood the music was played in.
    #[serde(default)]
    pub mood: Option<String>,

    /// Free-form context note.
    #[serde(default)]
    pub context: Option<String>,
}

// ============================================================================
// Output Structure
// ============================================================================

#[derive(Debug, Serialize, JsonSchema)]
pub struct FeedbackOutput {
    pub success: bool,
    pub prompt: String,
    pub feedback: String,
    pub liked: bool,
    pub total_preferences: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Feedback tool - teaches the preference store what the user enjoyed.
pub struct RecordMusicFeedbackTool;

impl RecordMusicFeedbackTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "record_music_feedback";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Record user feedback on a generated track (like, dislike, skip or replay), optionally tagged with activity and mood. Likes and replays feed future recommendations.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(feedback = %params.feedback))]
    pub async fn execute(params: &RecordFeedbackParams, ctx: &ServerContext) -> CallToolResult {
        info!(
            "Recording '{}' feedback for '{}'",
            params.feedback,
            preview(&params.prompt)
        );

        if params.prompt.trim().is_empty() {
            return error_result("Prompt cannot be empty");
        }
        let kind: FeedbackKind = match params.feedback.parse() {
            Ok(kind) => kind,
            Err(e) => return error_result(e.to_string()),
        };

        let mut tags = PreferenceTags::default();
        if let Some(activity) = non_blank(&params.activity) {
            tags = tags.activity(activity);
        }
        if let Some(mood) = non_blank(&params.mood) {
            tags = tags.mood(mood);
        }
        if let Some(context) = non_blank(&params.context) {
            tags = tags.context(context);
        }

        let mut store = ctx.preferences.lock().await;
        let warning = store.record_feedback(params.prompt.as_str(), kind, tags).warning();
        let total_preferences = store.len();
        drop(store);

        let summary = format!("Recorded '{}' feedback for '{}'", kind, preview(&params.prompt));
        let output = FeedbackOutput {
            success: true,
            prompt: params.prompt.clone(),
            feedback: kind.as_str().to_string(),
            liked: kind.is_positive(),
            total_preferences,
            warning,
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

        let params: RecordFeedbackParams = parse_http_arguments(arguments)?;
        info!("Feedback tool (HTTP) called");
        to_http_value(&Self::execute(&params, &ctx).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<RecordFeedbackParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<FeedbackOutput>().into()),
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
                let params: RecordFeedbackParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}
