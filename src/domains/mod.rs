//! Domains module containing business logic organized by bounded contexts.
//!
//! The music domains (`generation`, `composition`, `context`, `preferences`,
//! `library`) hold the core logic; `tools`, `resources` and `prompts` expose
//! it over MCP.

pub mod composition;
pub mod context;
pub mod generation;
pub mod library;
pub mod preferences;
pub mod prompts;
pub mod resources;
pub mod tools;
