//! Error types and handling for the music composer server.
//!
//! Each domain owns its error enum; this module unifies them so that server
//! setup and transports can use one `Result` type.

use thiserror::Error;

/// A specialized Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the server.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Tool error: {0}")]
    Tool(#[from] crate::domains::tools::ToolError),

    #[error("Resource error: {0}")]
    Resource(#[from] crate::domains::resources::ResourceError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] crate::domains::prompts::PromptError),

    /// Error from the generation API client.
    #[error("Generation error: {0}")]
    Generation(#[from] crate::domains::generation::GenerationError),

    #[error("Preference error: {0}")]
    Preference(#[from] crate::domains::preferences::PreferenceError),

    #[error("Library error: {0}")]
    Library(#[from] crate::domains::library::LibraryError),

    #[error("Plan error: {0}")]
    Plan(#[from] crate::domains::composition::PlanError),

    #[error("Transport error: {0}")]
    Transport(#[from] crate::core::transport::TransportError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from file operations or network communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
