//! MCP server handler.
//!
//! Delegates tools, resources and prompts to their domain services. Tools are
//! routed through the `ToolRouter` built in `domains/tools/router.rs`; the
//! HTTP transport dispatches through `ToolRegistry` instead.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, handler::server::tool::ToolRouter, model::*,
    service::RequestContext, tool_handler,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::config::Config;
use super::context::ServerContext;
use crate::domains::{
    prompts::PromptService, resources::ResourceService, tools::build_tool_router,
};

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

const INSTRUCTIONS: &str = "Generates music with the ElevenLabs Music API and learns what the user likes. \
Use analyze_mood_for_music to turn a situation into a prompt, create_composition_plan to shape \
longer pieces, and generate_music_simple or generate_music_structured to render audio. \
Record the user's reaction with record_music_feedback so get_music_recommendations improves.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    ctx: Arc<ServerContext>,
    resource_service: Arc<ResourceService>,
    prompt_service: Arc<PromptService>,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server backed by the real generation client.
    pub fn new(config: Config) -> super::error::Result<Self> {
        Ok(Self::from_context(Arc::new(ServerContext::new(config)?)))
    }

    /// Create a server around an existing context.
    pub fn from_context(ctx: Arc<ServerContext>) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(ctx.clone()),
            resource_service: Arc::new(ResourceService::new(ctx.clone())),
            prompt_service: Arc::new(PromptService::new()),
            ctx,
        }
    }

    pub fn name(&self) -> &str {
        &self.ctx.config.server.name
    }

    pub fn version(&self) -> &str {
        &self.ctx.config.server.version
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.ctx
    }

    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ------------------------------------------------------------------
    // HTTP transport support
    // ------------------------------------------------------------------

    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        ToolRegistry::new(self.ctx.clone())
            .call_tool(name, arguments)
            .await
            .map_err(|e| e.to_string())
    }

    pub fn list_resources(&self) -> Vec<serde_json::Value> {
        self.resource_service
            .list_resources()
            .into_iter()
            .map(|r| {
                serde_json::json!({
                    "uri": r.uri,
                    "name": r.name,
                    "description": r.description,
                    "mimeType": r.mime_type
                })
            })
            .collect()
    }

    pub async fn read_resource(&self, uri: &str) -> Result<serde_json::Value, String> {
        self.resource_service
            .read_resource(uri)
            .await
            .map(|result| serde_json::json!({ "contents": result.contents }))
            .map_err(|e| e.to_string())
    }

    pub fn list_prompts(&self) -> Vec<serde_json::Value> {
        self.prompt_service
            .list_prompts()
            .into_iter()
            .map(|p| {
                serde_json::json!({
                    "name": p.name,
                    "description": p.description,
                    "arguments": p.arguments
                })
            })
            .collect()
    }

    pub fn get_prompt(
        &self,
        name: &str,
        arguments: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, String> {
        let args = arguments.and_then(|v| v.as_object().map(string_arguments));

        self.prompt_service
            .get_prompt(name, args)
            .map(|result| {
                serde_json::json!({
                    "description": result.description,
                    "messages": result.messages
                })
            })
            .map_err(|e| e.to_string())
    }
}

/// Keep only string-valued prompt arguments.
fn string_arguments(
    map: &serde_json::Map<String, serde_json::Value>,
) -> std::collections::HashMap<String, String> {
    map.iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.instructions().to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        info!("Listing resources");
        Ok(ListResourcesResult {
            resources: self.resource_service.list_resources(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        info!("Reading resource: {}", request.uri);
        self.resource_service
            .read_resource(&request.uri)
            .await
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))
    }

    #[instrument(skip(self, _context))]
    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        info!("Listing prompts");
        Ok(ListPromptsResult {
            prompts: self.prompt_service.list_prompts(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, _context))]
    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        info!("Getting prompt: {}", request.name);
        let arguments = request.arguments.as_ref().map(string_arguments);
        self.prompt_service
            .get_prompt(&request.name, arguments)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }
}
