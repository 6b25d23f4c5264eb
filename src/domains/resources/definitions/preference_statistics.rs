//! Live preference statistics resource.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::{DynamicResourceProvider, ResourceDefinition};
use crate::core::ServerContext;
use crate::domains::resources::error::ResourceError;
use crate::domains::resources::service::{DynamicResourceType, ResourceContent};

pub struct PreferenceStatisticsResource;

impl ResourceDefinition for PreferenceStatisticsResource {
    const URI: &'static str = "music://preferences/statistics";
    const NAME: &'static str = "Preference Statistics";
    const DESCRIPTION: &'static str =
        "Current totals, like rate and favourite moods and activities from recorded preferences";
    const MIME_TYPE: &'static str = "application/json";

    fn content() -> ResourceContent {
        ResourceContent::Dynamic(DynamicResourceType::PreferenceStatistics)
    }
}

#[async_trait]
impl DynamicResourceProvider for PreferenceStatisticsResource {
    async fn resolve(ctx: &ServerContext) -> Result<Value, ResourceError> {
        let statistics = ctx.preferences.lock().await.get_statistics();
        let mut value =
            serde_json::to_value(statistics).map_err(|e| ResourceError::internal(e.to_string()))?;
        value["learning_enabled"] = json!(ctx.learning_enabled());
        Ok(value)
    }
}
