//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::core::ServerContext;

use super::definitions::{
    AnalyzeMoodForMusicTool, CreateCompositionPlanTool, GenerateMusicSimpleTool,
    GenerateMusicStructuredTool, GetMusicRecommendationsTool, GetPreferenceStatisticsTool,
    ManagePreferencesTool, RecordMusicFeedbackTool,
};
#[cfg(feature = "http")]
use super::error::ToolError;

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    ctx: Arc<ServerContext>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(ctx: Arc<ServerContext>) -> Self {
        Self { ctx }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            GenerateMusicSimpleTool::NAME,
            GenerateMusicStructuredTool::NAME,
            CreateCompositionPlanTool::NAME,
            AnalyzeMoodForMusicTool::NAME,
            RecordMusicFeedbackTool::NAME,
            GetMusicRecommendationsTool::NAME,
            GetPreferenceStatisticsTool::NAME,
            ManagePreferencesTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            GenerateMusicSimpleTool::to_tool(),
            GenerateMusicStructuredTool::to_tool(),
            CreateCompositionPlanTool::to_tool(),
            AnalyzeMoodForMusicTool::to_tool(),
            RecordMusicFeedbackTool::to_tool(),
            GetMusicRecommendationsTool::to_tool(),
            GetPreferenceStatisticsTool::to_tool(),
            ManagePreferencesTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let ctx = self.ctx.clone();
        let result = match name {
            GenerateMusicSimpleTool::NAME => GenerateMusicSimpleTool::http_handler(arguments, ctx).await,
            GenerateMusicStructuredTool::NAME => {
                GenerateMusicStructuredTool::http_handler(arguments, ctx).await
            }
            CreateCompositionPlanTool::NAME => {
                CreateCompositionPlanTool::http_handler(arguments, ctx).await
            }
            AnalyzeMoodForMusicTool::NAME => AnalyzeMoodForMusicTool::http_handler(arguments, ctx).await,
            RecordMusicFeedbackTool::NAME => RecordMusicFeedbackTool::http_handler(arguments, ctx).await,
            GetMusicRecommendationsTool::NAME => {
                GetMusicRecommendationsTool::http_handler(arguments, ctx).await
            }
            GetPreferenceStatisticsTool::NAME => {
                GetPreferenceStatisticsTool::http_handler(arguments, ctx).await
            }
            ManagePreferencesTool::NAME => ManagePreferencesTool::http_handler(arguments, ctx).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(ToolError::not_found(name));
            }
        };
        result.map_err(ToolError::invalid_arguments)
    }
}
