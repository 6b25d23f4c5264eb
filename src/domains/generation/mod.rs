//! Generation domain module.
//!
//! Client for the external text-to-music API. The client retries transient
//! failures and normalizes every response into a [`GenerationResult`].

mod client;
mod error;
mod result;

pub use client::{
    ComposeResponse, DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_FORMAT,
    DEFAULT_TIMEOUT_SECS, GenerationClient, GeneratorConfig, MusicComposer,
};
pub use error::GenerationError;
pub use result::GenerationResult;
