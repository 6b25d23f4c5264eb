//! Music Composer MCP Server
//!
//! A Model Context Protocol server that turns natural-language requests into
//! music through the ElevenLabs Music API, saves the audio with metadata and
//! learns listener preferences from feedback.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, the shared [`core::ServerContext`],
//!   the MCP handler and transports
//! - **domains**: business logic by bounded context
//!   - **generation**: HTTP client for the music API with retry and backoff
//!   - **composition**: section-by-section composition plans and templates
//!   - **context**: mood and activity detection from free text
//!   - **preferences**: feedback history, statistics and recommendations
//!   - **library**: on-disk layout for generated audio and metadata
//!   - **tools**, **resources**, **prompts**: the MCP surface
//!
//! # Example
//!
//! ```rust,no_run
//! use music_composer_mcp::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result, ServerContext};
