//! Server info resource definition.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{DynamicResourceProvider, ResourceDefinition};
use crate::core::ServerContext;
use crate::domains::resources::error::ResourceError;
use crate::domains::resources::service::{DynamicResourceType, ResourceContent};
use crate::domains::tools::ToolRegistry;

/// Server information resource (dynamic).
pub struct ServerInfoResource;

impl ResourceDefinition for ServerInfoResource {
    const URI: &'static str = "music://server/info";
    const NAME: &'static str = "Server Information";
    const DESCRIPTION: &'static str =
        "Server version, generation defaults, storage locations and available tools";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Dynamic(DynamicResourceType::ServerInfo)
    }
}

#[async_trait]
impl DynamicResourceProvider for ServerInfoResource {
    async fn resolve(ctx: &ServerContext) -> Result<Value, ResourceError> {
        let config = &ctx.config;
        let preferences = ctx.preferences.lock().await.location();
        let tool_names: Vec<String> = ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| t.name.into_owned())
            .collect();

        Ok(json!({
            "server": config.server.name,
            "version": config.server.version,
            "transport": config.transport.description(),
            "api": {
                "base_url": config.api.base_url,
                "timeout_secs": config.api.timeout_secs,
                "max_retries": config.api.max_retries,
                "api_key_configured": config.credentials.elevenlabs_api_key.is_some(),
            },
            "generation": {
                "default_output_format": config.generation.default_output_format,
                "default_duration_ms": config.generation.default_duration_ms,
                "min_duration_ms": config.generation.min_duration_ms,
                "max_duration_ms": config.generation.max_duration_ms,
            },
            "storage": {
                "music_output_dir": config.storage.music_output_dir.display().to_string(),
                "preferences": preferences,
            },
            "preference_learning": ctx.learning_enabled(),
            "tools": tool_names,
        }))
    }
}
