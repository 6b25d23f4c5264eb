//! Recommendation tool definition.

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
use crate::domains::tools::definitions::common::{non_blank, parse_arguments, structured_result};

const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 20;
const FAVORITES_LIMIT: usize = 3;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Parameters for the recommendation tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RecommendationParams {
    /// Only consider prompts liked during this activity.
    #[serde(default)]
    pub activity: Option<String>,

    /// Only consider prompts liked in this mood.
    #[serde(default)]
    pub mood: Option<String>,

    /// Maximum number of prompts (1-20, default 5).
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RecommendationOutput {
    pub success: bool,
    /// Liked prompts, most recent first.
    pub recommendations: Vec<String>,
    pub favorite_moods: Vec<String>,
    pub favorite_activities: Vec<String>,
    pub total_preferences: usize,
}

/// Recommendation tool - previously liked prompts for a situation.
pub struct GetMusicRecommendationsTool;

impl GetMusicRecommendationsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_music_recommendations";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Get previously liked music prompts, optionally filtered by activity and mood, plus the user's favourite moods and activities. Falls back to all liked prompts when nothing matches the filters.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(activity = ?params.activity, mood = ?params.mood))]
    pub async fn execute(params: &RecommendationParams, ctx: &ServerContext) -> CallToolResult {
        let limit = params.limit.clamp(1, MAX_LIMIT);
        let store = ctx.preferences.lock().await;

        let output = RecommendationOutput {
            success: true,
            recommendations: store.get_recommendations(
                non_blank(&params.activity),
                non_blank(&params.mood),
                limit,
            ),
            favorite_moods: store.get_favorite_moods(FAVORITES_LIMIT),
            favorite_activities: store.get_favorite_activities(FAVORITES_LIMIT),
            total_preferences: store.len(),
        };
        drop(store);

        info!("Returning {} recommendations", output.recommendations.len());
        let summary = if output.recommendations.is_empty() {
            "No liked music recorded yet".to_string()
        } else {
            format!("Recommendations: {}", output.recommendations.join("; "))
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

        let params: RecommendationParams = parse_http_arguments(arguments)?;
        to_http_value(&Self::execute(&params, &ctx).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<RecommendationParams>().into(),
            annotations: None,
            output_schema: Some(schema_for_type::<RecommendationOutput>().into()),
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
                let params: RecommendationParams = parse_arguments(args)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}
