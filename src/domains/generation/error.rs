//! Generation API error taxonomy.

use thiserror::Error;

/// Errors raised by the low-level request loop of the generation client.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Timeouts and connection failures that survived every retry.
    #[error("Request failed after {attempts} attempts: {source}")]
    TransientNetwork {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    /// The API kept answering 429 until the attempt budget ran out.
    #[error("API rate limit exceeded after {attempts} attempts. Please try again later.")]
    RateLimited { attempts: u32 },

    /// The prompt was rejected as referencing protected material.
    #[error("Copyright detected: {message}")]
    CopyrightRejected {
        message: String,
        suggested_prompt: Option<String>,
    },

    /// The API key was refused.
    #[error("Invalid API key. Please check your ELEVENLABS_API_KEY.")]
    Unauthorized,

    /// Any other non-success response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl GenerationError {
    /// Whether the request loop retries this condition.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientNetwork { .. } | Self::RateLimited { .. })
    }

    /// HTTP status associated with the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::RateLimited { .. } => Some(429),
            Self::CopyrightRejected { .. } => Some(400),
            Self::Unauthorized => Some(401),
            Self::Api { status, .. } => Some(*status),
            Self::TransientNetwork { .. } | Self::Client(_) => None,
        }
    }
}
