//! Path validation for user-supplied file locations.
//!
//! Preference import and export accept paths from MCP clients. When a root
//! directory is configured, every such path must resolve inside it.

pub mod path_validator;

pub use path_validator::{PathSecurityError, validate_existing_path, validate_output_path};
