//! Composition template catalogue resource.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{DynamicResourceProvider, ResourceDefinition};
use crate::core::ServerContext;
use crate::domains::resources::error::ResourceError;
use crate::domains::resources::service::{DynamicResourceType, ResourceContent};

/// Built-in composition templates usable with `create_composition_plan`.
pub struct CompositionTemplatesResource;

impl ResourceDefinition for CompositionTemplatesResource {
    const URI: &'static str = "music://composition/templates";
    const NAME: &'static str = "Composition Templates";
    const DESCRIPTION: &'static str =
        "Built-in multi-section templates with section styles, moods and length shares";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Dynamic(DynamicResourceType::CompositionTemplates)
    }
}

#[async_trait]
impl DynamicResourceProvider for CompositionTemplatesResource {
    async fn resolve(ctx: &ServerContext) -> Result<Value, ResourceError> {
        let templates = serde_json::to_value(ctx.planner.templates())
            .map_err(|e| ResourceError::internal(e.to_string()))?;
        Ok(json!({ "templates": templates }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::testing::{FakeComposer, test_context};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_templates_listed_with_sections() {
        let (_dir, ctx) = test_context(Arc::new(FakeComposer::succeeding()));
        let value = CompositionTemplatesResource::resolve(&ctx).await.unwrap();
        let templates = value["templates"].as_array().unwrap();
        assert_eq!(templates.len(), 5);
        assert_eq!(templates[0]["name"], "focus_work");
        assert!(templates[0]["sections"].as_array().is_some_and(|s| !s.is_empty()));
        assert!(templates[0].get("keywords").is_none());
    }
}
