//! Tool Router - builds the rmcp ToolRouter from the tool definitions.
//!
//! This module builds the ToolRouter for STDIO/TCP transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::ServerContext;

use super::definitions::{
    AnalyzeMoodForMusicTool, CreateCompositionPlanTool, GenerateMusicSimpleTool,
    GenerateMusicStructuredTool, GetMusicRecommendationsTool, GetPreferenceStatisticsTool,
    ManagePreferencesTool, RecordMusicFeedbackTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(ctx: Arc<ServerContext>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GenerateMusicSimpleTool::create_route(ctx.clone()))
        .with_route(GenerateMusicStructuredTool::create_route(ctx.clone()))
        .with_route(CreateCompositionPlanTool::create_route(ctx.clone()))
        .with_route(AnalyzeMoodForMusicTool::create_route(ctx.clone()))
        .with_route(RecordMusicFeedbackTool::create_route(ctx.clone()))
        .with_route(GetMusicRecommendationsTool::create_route(ctx.clone()))
        .with_route(GetPreferenceStatisticsTool::create_route(ctx.clone()))
        .with_route(ManagePreferencesTool::create_route(ctx))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::domains::tools::definitions::testing::{FakeComposer, test_context};

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let (_dir, ctx) = test_context(Arc::new(FakeComposer::succeeding()));
        let router: ToolRouter<TestServer> = build_tool_router(ctx);
        let tools = router.list_all();
        assert_eq!(tools.len(), 8);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"generate_music_simple"));
        assert!(names.contains(&"generate_music_structured"));
        assert!(names.contains(&"create_composition_plan"));
        assert!(names.contains(&"analyze_mood_for_music"));
        assert!(names.contains(&"manage_preferences"));
    }

    #[test]
    fn test_registry_matches_router() {
        let (_dir, ctx) = test_context(Arc::new(FakeComposer::succeeding()));
        let registry = ToolRegistry::new(ctx.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(ctx);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
