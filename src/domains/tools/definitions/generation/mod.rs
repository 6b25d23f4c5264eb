//! Music generation tools.
//!
//! Both tools follow the same flow: call the composer, save the audio and
//! its metadata to the library, then record the generation as a liked
//! preference.

pub mod simple;
pub mod structured;

pub use simple::{GenerateMusicSimpleTool, GenerateSimpleParams};
pub use structured::{GenerateMusicStructuredTool, GenerateStructuredParams};

use rmcp::model::CallToolResult;
use serde_json::{Map, Value, json};
use std::path::Path;
use tracing::{debug, warn};

use super::common::error_with_details;
use crate::core::ServerContext;
use crate::domains::generation::GenerationResult;
use crate::domains::library::SavedMusic;

/// Save audio and metadata off the async runtime.
async fn save_track(
    ctx: &ServerContext,
    audio: Vec<u8>,
    metadata: Map<String, Value>,
    prompt: String,
    output_format: String,
) -> Result<SavedMusic, String> {
    let library = ctx.library.clone();
    tokio::task::spawn_blocking(move || library.save_music(&audio, metadata, &prompt, &output_format))
        .await
        .map_err(|e| format!("Save task failed: {}", e))?
        .map_err(|e| e.to_string())
}

/// Record a finished generation; returns a warning if it was not persisted.
async fn remember_generation(
    ctx: &ServerContext,
    prompt: &str,
    metadata: &Map<String, Value>,
    audio_path: &Path,
) -> Option<String> {
    if !ctx.learning_enabled() {
        debug!("Preference learning disabled, not recording generation");
        return None;
    }

    let metadata = Value::Object(metadata.clone());
    let status = ctx
        .preferences
        .lock()
        .await
        .record_generation(prompt, &metadata, audio_path);
    let warning = status.warning();
    if let Some(w) = &warning {
        warn!("Failed to record preference: {}", w);
    }
    warning
}

/// Tool result for a generation that did not succeed.
fn generation_failure(outcome: &GenerationResult, copyright_hint: &str) -> CallToolResult {
    let error = outcome.error_message().unwrap_or("Unknown error").to_string();
    let mut details = json!({
        "success": false,
        "error": error,
        "error_type": outcome.kind(),
    });

    let message = match outcome {
        GenerationResult::CopyrightRejected {
            suggested_prompt: Some(suggestion),
            ..
        } => {
            details["suggested_prompt"] = json!(suggestion);
            let message = format!("Copyright issue detected. {}: '{}'", copyright_hint, suggestion);
            details["message"] = json!(message);
            message
        }
        GenerationResult::GenericError {
            status_code: Some(code),
            ..
        } => {
            details["status_code"] = json!(code);
            error
        }
        _ => error,
    };

    error_with_details(message, details)
}
