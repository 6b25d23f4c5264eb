//! Helpers shared across the tool definitions.

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content, JsonObject};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Longest prompt excerpt written to the logs.
const PREVIEW_CHARS: usize = 50;

/// Create an error result with a plain message.
pub fn error_result(message: impl Into<String>) -> CallToolResult {
    let message = message.into();
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message)])
}

/// Create an error result that also carries structured details.
pub fn error_with_details(message: impl Into<String>, details: Value) -> CallToolResult {
    let message = message.into();
    warn!("{}", message);
    CallToolResult {
        content: vec![Content::text(message)],
        structured_content: Some(details),
        is_error: Some(true),
        meta: None,
    }
}

/// Create a success result with a text summary and structured output.
pub fn structured_result<T: Serialize>(summary: impl Into<String>, output: &T) -> CallToolResult {
    match serde_json::to_value(output) {
        Ok(value) => CallToolResult {
            content: vec![Content::text(summary.into())],
            structured_content: Some(value),
            is_error: Some(false),
            meta: None,
        },
        Err(e) => error_result(format!("Failed to serialize tool output: {}", e)),
    }
}

/// Parse rmcp call arguments into a parameter struct.
pub fn parse_arguments<P: DeserializeOwned>(arguments: Option<JsonObject>) -> Result<P, McpError> {
    let args = arguments.unwrap_or_default();
    serde_json::from_value(Value::Object(args)).map_err(|e| McpError::invalid_params(e.to_string(), None))
}

/// Parse HTTP call arguments into a parameter struct.
#[cfg(feature = "http")]
pub fn parse_http_arguments<P: DeserializeOwned>(arguments: Value) -> Result<P, String> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {}", e))
}

/// Serialize a tool result for the HTTP transport.
#[cfg(feature = "http")]
pub fn to_http_value(result: &CallToolResult) -> Result<Value, String> {
    serde_json::to_value(result).map_err(|e| e.to_string())
}

/// Short excerpt of a prompt for log lines.
pub fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(PREVIEW_CHARS).collect::<String>())
    }
}

/// Treat blank optional strings as absent.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
