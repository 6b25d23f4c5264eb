//! Transports that carry MCP sessions to the music server.
//!
//! - `stdio` (default feature): one session on stdin/stdout
//! - `tcp`: one session per accepted connection, all sharing one context
//! - `http`: stateless JSON-RPC over POST, served by axum
//!
//! At least one of the three features must be enabled.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
