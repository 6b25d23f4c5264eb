//! Resource definitions module.
//!
//! Each resource is defined in its own file with:
//! - URI and metadata
//! - Content provider
//!
//! ## Adding a New Resource
//!
//! 1. Create a new file (e.g., `my_resource.rs`)
//! 2. Implement the `ResourceDefinition` trait
//! 3. Export it here
//! 4. Register in `registry.rs`

mod composition_templates;
mod preference_statistics;
mod server_info;

pub use composition_templates::CompositionTemplatesResource;
pub use preference_statistics::PreferenceStatisticsResource;
pub use server_info::ServerInfoResource;

use async_trait::async_trait;
use serde_json::Value;

use super::error::ResourceError;
use super::service::ResourceContent;
use crate::core::ServerContext;

/// Trait for resource definitions.
///
/// Each resource must implement this trait to provide its metadata and content.
pub trait ResourceDefinition {
    /// The unique URI of the resource.
    const URI: &'static str;

    /// The display name of the resource.
    const NAME: &'static str;

    /// A description of the resource.
    const DESCRIPTION: &'static str;

    /// The MIME type of the resource content.
    const MIME_TYPE: &'static str;

    /// Get the content for this resource.
    fn content() -> ResourceContent;
}

/// Trait for resources whose content is computed on every read.
#[async_trait]
pub trait DynamicResourceProvider {
    /// Build the current JSON document for this resource.
    async fn resolve(ctx: &ServerContext) -> Result<Value, ResourceError>;
}
