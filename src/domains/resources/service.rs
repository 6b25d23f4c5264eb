//! Resource service implementation.
//!
//! The ResourceService manages resource discovery and access. Resources are
//! defined in `definitions/` and registered via `registry.rs`; adding a new
//! one does not require modifying this file beyond its dynamic content type.

use rmcp::model::{ReadResourceResult, Resource, ResourceContents};
use std::sync::Arc;
use tracing::{debug, info};

use super::definitions::{
    CompositionTemplatesResource, DynamicResourceProvider, PreferenceStatisticsResource,
    ServerInfoResource,
};
use super::error::ResourceError;
use super::registry::get_all_resources;
use crate::core::ServerContext;

/// Service for listing and reading resources.
pub struct ResourceService {
    ctx: Arc<ServerContext>,

    /// Registered resources, in registration order.
    resources: Vec<ResourceEntry>,
}

/// An entry in the resource registry.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    /// The resource metadata.
    pub resource: Resource,

    /// The content provider for this resource.
    pub content: ResourceContent,
}

/// Different types of resource content.
#[derive(Debug, Clone)]
pub enum ResourceContent {
    /// Static text content.
    Text(String),

    /// Content computed from server state on each read.
    Dynamic(DynamicResourceType),
}

/// Types of dynamic resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicResourceType {
    ServerInfo,
    CompositionTemplates,
    PreferenceStatistics,
}

impl ResourceService {
    /// Create a new ResourceService over the shared server context.
    pub fn new(ctx: Arc<ServerContext>) -> Self {
        info!("Initializing ResourceService");
        let mut service = Self {
            ctx,
            resources: Vec::new(),
        };
        for entry in get_all_resources() {
            service.register_resource(entry);
        }
        service
    }

    /// Register a resource, replacing any entry with the same URI.
    pub fn register_resource(&mut self, entry: ResourceEntry) {
        debug!("Registering resource: {}", entry.resource.raw.uri);
        self.resources
            .retain(|existing| existing.resource.raw.uri != entry.resource.raw.uri);
        self.resources.push(entry);
    }

    /// List all available resources.
    pub fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .iter()
            .map(|entry| entry.resource.clone())
            .collect()
    }

    /// Read a resource by URI.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, ResourceError> {
        let entry = self
            .resources
            .iter()
            .find(|entry| entry.resource.raw.uri == uri)
            .ok_or_else(|| ResourceError::not_found(uri))?;

        let content = match &entry.content {
            ResourceContent::Text(text) => ResourceContents::text(text, uri),
            ResourceContent::Dynamic(dynamic_type) => {
                let value = self.resolve_dynamic_content(*dynamic_type).await?;
                let text = serde_json::to_string_pretty(&value)
                    .map_err(|e| ResourceError::internal(e.to_string()))?;
                ResourceContents::text(text, uri)
            }
        };

        Ok(ReadResourceResult {
            contents: vec![content],
        })
    }

    async fn resolve_dynamic_content(
        &self,
        dynamic_type: DynamicResourceType,
    ) -> Result<serde_json::Value, ResourceError> {
        let ctx = self.ctx.as_ref();
        match dynamic_type {
            DynamicResourceType::ServerInfo => ServerInfoResource::resolve(ctx).await,
            DynamicResourceType::CompositionTemplates => {
                CompositionTemplatesResource::resolve(ctx).await
            }
            DynamicResourceType::PreferenceStatistics => {
                PreferenceStatisticsResource::resolve(ctx).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::testing::{FakeComposer, test_context};
    use rmcp::model::{AnnotateAble, RawResource};

    fn service() -> (tempfile::TempDir, ResourceService) {
        let (dir, ctx) = test_context(Arc::new(FakeComposer::succeeding()));
        (dir, ResourceService::new(ctx))
    }

    fn text_of(result: &ReadResourceResult) -> &str {
        match &result.contents[0] {
            ResourceContents::TextResourceContents { text, .. } => text,
            other => panic!("expected text contents, got {:?}", other),
        }
    }

    #[test]
    fn test_resource_service_creation() {
        let (_dir, service) = service();
        let resources = service.list_resources();
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0].raw.uri, "music://server/info");
    }

    #[tokio::test]
    async fn test_read_dynamic_resource() {
        let (_dir, service) = service();
        let result = service
            .read_resource("music://composition/templates")
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(value["templates"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_read_static_resource_and_replace() {
        let (_dir, mut service) = service();
        let mut raw = RawResource::new("music://notes", "Notes");
        raw.mime_type = Some("text/plain".to_string());
        service.register_resource(ResourceEntry {
            resource: raw.clone().no_annotation(),
            content: ResourceContent::Text("first".to_string()),
        });
        service.register_resource(ResourceEntry {
            resource: raw.no_annotation(),
            content: ResourceContent::Text("second".to_string()),
        });

        assert_eq!(service.list_resources().len(), 4);
        let result = service.read_resource("music://notes").await.unwrap();
        assert_eq!(text_of(&result), "second");
    }

    #[tokio::test]
    async fn test_read_nonexistent_resource() {
        let (_dir, service) = service();
        let result = service.read_resource("music://nonexistent").await;
        assert!(matches!(result, Err(ResourceError::NotFound(_))));
    }
}
