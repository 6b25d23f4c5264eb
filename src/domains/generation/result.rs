//! Normalized generation outcome.

use serde_json::Value;

use super::error::GenerationError;

/// Outcome of one logical generation request.
///
/// Exactly one variant is produced per call; a request is never partially
/// successful.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult {
    Success {
        audio: Vec<u8>,
        composition_plan: Option<Value>,
        duration_ms: Option<u64>,
    },
    CopyrightRejected {
        message: String,
        suggested_prompt: Option<String>,
    },
    RateLimited {
        message: String,
    },
    Unauthorized {
        message: String,
    },
    GenericError {
        message: String,
        status_code: Option<u16>,
    },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Error message for failed outcomes.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::CopyrightRejected { message, .. }
            | Self::RateLimited { message }
            | Self::Unauthorized { message }
            | Self::GenericError { message, .. } => Some(message),
        }
    }

    /// Replacement prompt offered by a copyright rejection.
    pub fn suggested_prompt(&self) -> Option<&str> {
        match self {
            Self::CopyrightRejected {
                suggested_prompt, ..
            } => suggested_prompt.as_deref(),
            _ => None,
        }
    }

    /// Short machine-readable label for the outcome.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::CopyrightRejected { .. } => "copyright_rejected",
            Self::RateLimited { .. } => "rate_limited",
            Self::Unauthorized { .. } => "unauthorized",
            Self::GenericError { .. } => "error",
        }
    }
}

impl From<GenerationError> for GenerationResult {
    fn from(err: GenerationError) -> Self {
        let message = err.to_string();
        match err {
            GenerationError::CopyrightRejected {
                suggested_prompt, ..
            } => Self::CopyrightRejected {
                message,
                suggested_prompt,
            },
            GenerationError::RateLimited { .. } => Self::RateLimited { message },
            GenerationError::Unauthorized => Self::Unauthorized { message },
            other => Self::GenericError {
                status_code: other.status_code(),
                message,
            },
        }
    }
}
