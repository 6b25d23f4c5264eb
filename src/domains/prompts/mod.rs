//! Prompts domain module.
//!
//! Prompts are ready-made user messages that steer a model through the
//! music tools for common situations.
//!
//! - `definitions/` - one file per prompt
//! - `registry.rs` - central prompt registration
//! - `service.rs` - listing and rendering
//! - `templates.rs` - `{{variable}}` template rendering

pub mod definitions;
mod error;
mod registry;
mod service;
pub mod templates;

pub use definitions::PromptDefinition;
pub use error::PromptError;
pub use registry::{get_all_prompts, prompt_names};
pub use service::PromptService;
pub use templates::PromptTemplate;
