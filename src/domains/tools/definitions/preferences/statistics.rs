//! Preference statistics tool definition.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::core::ServerContext;
use crate::domains::preferences::PreferenceStatistics;
use crate::domains::tools::definitions::common::{parse_arguments, structured_result};

/// The statistics tool takes no parameters.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct StatisticsParams {}

#[derive(Debug, Serialize)]
pub struct StatisticsOutput {
    pub success: bool,
    /// Where preferences are stored, or "memory".
    pub storage: String,
    pub learning_enabled: bool,
    #[serde(flatten)]
    pub statistics: PreferenceStatistics,
}

/// Statistics tool - summarises the preference history.
pub struct GetPreferenceStatisticsTool;

impl GetPreferenceStatisticsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_preference_statistics";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Summarise the recorded music preferences: totals, like rate, favourite moods and activities, and the most recent entries.";

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub async fn execute(ctx: &ServerContext) -> CallToolResult {
        let store = ctx.preferences.lock().await;
        let output = StatisticsOutput {
            success: true,
            storage: store.location(),
            learning_enabled: ctx.learning_enabled(),
            statistics: store.get_statistics(),
        };
        drop(store);

        let stats = &output.statistics;
        let summary = format!(
            "{} preferences recorded, {} liked ({:.0}% like rate)",
            stats.total_generations,
            stats.liked_count,
            stats.like_rate * 100.0
        );
        structured_result(summary, &output)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        _arguments: serde_json::Value,
        ctx: Arc<ServerContext>,
    ) -> Result<serde_json::Value, String> {
        use crate::domains::tools::definitions::common::to_http_value;

        to_http_value(&Self::execute(&ctx).await)
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: schema_for_type::<StatisticsParams>().into(),
            annotations: None,
            output_schema: None,
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
                let _params: StatisticsParams = parse_arguments(args)?;
                Ok(Self::execute(&ctx).await)
            }
            .boxed()
        })
    }
}
