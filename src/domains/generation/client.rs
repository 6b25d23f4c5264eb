//! HTTP client for the music generation API.
//!
//! Every request goes through [`GenerationClient::send_with_retry`], which
//! owns the retry policy and classifies responses into [`GenerationError`].
//! The [`MusicComposer`] entry points then fold every outcome into a
//! [`GenerationResult`] so callers never see a transport fault.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::error::GenerationError;
use super::result::GenerationResult;
use crate::domains::composition::CompositionPlan;

/// Default API endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default total number of attempts per logical request.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default audio encoding tag.
pub const DEFAULT_OUTPUT_FORMAT: &str = "mp3_44100_128";

const API_KEY_HEADER: &str = "xi-api-key";
const PLAN_HEADER: &str = "x-composition-plan";
const COMPOSE_PATH: &str = "/music/compose";

/// Generates audio from prompts or composition plans.
#[async_trait]
pub trait MusicComposer: Send + Sync {
    /// Generate from a single free-text prompt.
    async fn generate_simple(
        &self,
        prompt: &str,
        duration_ms: Option<u64>,
        output_format: &str,
    ) -> GenerationResult;

    /// Generate from a multi-section composition plan.
    async fn generate_structured(
        &self,
        plan: &CompositionPlan,
        strict_duration: bool,
        output_format: &str,
    ) -> GenerationResult;
}

/// Configuration for [`GenerationClient`].
#[derive(Clone)]
pub struct GeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    /// Bound on a single HTTP exchange, not on the whole retry loop.
    pub timeout: Duration,
    /// Total attempts, including the first one.
    pub max_retries: u32,
    /// Base of the exponential backoff; attempt `n` waits `unit * 2^n`.
    pub backoff_unit: Duration,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("backoff_unit", &self.backoff_unit)
            .finish()
    }
}

/// Successful API response.
#[derive(Debug, Clone)]
pub struct ComposeResponse {
    pub audio: Vec<u8>,
    /// Plan echoed back by the API in a response header, if any.
    pub composition_plan: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(rename = "type", default)]
    error_type: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    suggested_prompt: Option<String>,
}

enum AttemptError {
    Transport(reqwest::Error),
    RateLimited { retry_after: Option<Duration> },
    Fatal(GenerationError),
}

/// Client for the `/music/compose` endpoint.
///
/// Holds one reusable HTTP session for its whole lifetime.
pub struct GenerationClient {
    http: Client,
    config: GeneratorConfig,
    endpoint: String,
}

impl GenerationClient {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Client(e.to_string()))?;

        let endpoint = format!("{}{}", config.base_url.trim_end_matches('/'), COMPOSE_PATH);

        info!(
            "Initializing generation client: url={}, timeout={:?}, max_retries={}",
            endpoint, config.timeout, config.max_retries
        );

        Ok(Self {
            http,
            config,
            endpoint,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST `body` to the compose endpoint, retrying transient failures.
    ///
    /// Rate limits wait for the `Retry-After` hint (falling back to the
    /// exponential delay) and network failures wait the exponential delay.
    /// No sleep follows the final attempt. Bad requests, authorization
    /// failures and other statuses return immediately.
    pub async fn send_with_retry(&self, body: &Value) -> Result<ComposeResponse, GenerationError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt: u32 = 0;

        loop {
            let is_last = attempt + 1 >= max_attempts;

            match self.attempt(body).await {
                Ok(response) => {
                    if attempt > 0 {
                        debug!(attempt = attempt + 1, "Generation request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(AttemptError::Fatal(err)) => return Err(err),
                Err(AttemptError::RateLimited { retry_after }) => {
                    let Some(wait) = self.rate_limit_wait(attempt, is_last, retry_after) else {
                        warn!(
                            attempt = attempt + 1,
                            max_attempts,
                            "Rate limited by generation API, giving up"
                        );
                        return Err(GenerationError::RateLimited {
                            attempts: max_attempts,
                        });
                    };
                    warn!(
                        attempt = attempt + 1,
                        max_attempts,
                        wait_ms = wait.as_millis() as u64,
                        "Rate limited by generation API"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(AttemptError::Transport(source)) => {
                    warn!(
                        attempt = attempt + 1,
                        max_attempts,
                        error = %source,
                        "Generation request failed"
                    );
                    if is_last {
                        return Err(GenerationError::TransientNetwork {
                            attempts: max_attempts,
                            source,
                        });
                    }
                    tokio::time::sleep(self.backoff(attempt)).await;
                }
            }

            attempt += 1;
        }
    }

    async fn attempt(&self, body: &Value) -> Result<ComposeResponse, AttemptError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(AttemptError::Transport)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let composition_plan = decode_plan_header(response.headers());
                let audio = response.bytes().await.map_err(AttemptError::Transport)?;
                Ok(ComposeResponse {
                    audio: audio.to_vec(),
                    composition_plan,
                })
            }
            StatusCode::TOO_MANY_REQUESTS => Err(AttemptError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            }),
            StatusCode::UNAUTHORIZED => Err(AttemptError::Fatal(GenerationError::Unauthorized)),
            StatusCode::BAD_REQUEST => {
                let text = response.text().await.unwrap_or_default();
                Err(AttemptError::Fatal(classify_bad_request(&text)))
            }
            other => {
                let text = response.text().await.unwrap_or_default();
                Err(AttemptError::Fatal(GenerationError::Api {
                    status: other.as_u16(),
                    message: text,
                }))
            }
        }
    }

    /// Delay before retrying a rate-limited attempt, `None` once attempts
    /// are exhausted.
    fn rate_limit_wait(
        &self,
        attempt: u32,
        is_last: bool,
        retry_after: Option<Duration>,
    ) -> Option<Duration> {
        if is_last {
            return None;
        }
        Some(retry_after.unwrap_or_else(|| self.backoff(attempt)))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.config.backoff_unit.saturating_mul(2u32.saturating_pow(attempt))
    }
}

#[async_trait]
impl MusicComposer for GenerationClient {
    async fn generate_simple(
        &self,
        prompt: &str,
        duration_ms: Option<u64>,
        output_format: &str,
    ) -> GenerationResult {
        info!(
            "Generating music: '{}' (duration: {:?}ms)",
            prompt.chars().take(50).collect::<String>(),
            duration_ms
        );

        let mut body = json!({
            "prompt": prompt,
            "output_format": output_format,
        });
        if let Some(ms) = duration_ms {
            body["duration_ms"] = json!(ms);
        }

        match self.send_with_retry(&body).await {
            Ok(response) => {
                info!("Successfully generated {} bytes of audio", response.audio.len());
                GenerationResult::Success {
                    audio: response.audio,
                    composition_plan: response.composition_plan,
                    duration_ms,
                }
            }
            Err(err) => {
                warn!("Generation failed: {}", err);
                err.into()
            }
        }
    }

    async fn generate_structured(
        &self,
        plan: &CompositionPlan,
        strict_duration: bool,
        output_format: &str,
    ) -> GenerationResult {
        info!("Generating structured music from {}-section plan", plan.sections.len());

        let plan_value = match serde_json::to_value(plan) {
            Ok(value) => value,
            Err(e) => {
                return GenerationResult::GenericError {
                    message: format!("Failed to encode composition plan: {}", e),
                    status_code: None,
                };
            }
        };

        let body = json!({
            "composition_plan": plan_value,
            "output_format": output_format,
            "strict_duration": strict_duration,
        });

        match self.send_with_retry(&body).await {
            Ok(response) => {
                info!("Successfully generated structured music ({} bytes)", response.audio.len());
                GenerationResult::Success {
                    audio: response.audio,
                    composition_plan: Some(plan_value),
                    duration_ms: Some(plan.sections_duration_ms()),
                }
            }
            Err(err) => {
                warn!("Structured generation failed: {}", err);
                err.into()
            }
        }
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn decode_plan_header(headers: &HeaderMap) -> Option<Value> {
    let raw = headers.get(PLAN_HEADER)?.to_str().ok()?;
    match serde_json::from_str(raw) {
        Ok(plan) => Some(plan),
        Err(e) => {
            debug!("Ignoring malformed {} header: {}", PLAN_HEADER, e);
            None
        }
    }
}

fn classify_bad_request(text: &str) -> GenerationError {
    let Ok(body) = serde_json::from_str::<ErrorBody>(text) else {
        return GenerationError::Api {
            status: 400,
            message: if text.is_empty() { "Bad request".to_string() } else { text.to_string() },
        };
    };

    let detail = body.error;
    if detail.error_type.as_deref() == Some("bad_prompt") {
        return GenerationError::CopyrightRejected {
            message: detail
                .message
                .unwrap_or_else(|| "Copyrighted content detected".to_string()),
            suggested_prompt: detail.suggested_prompt,
        };
    }

    GenerationError::Api {
        status: 400,
        message: detail.message.unwrap_or_else(|| "Bad request".to_string()),
    }
}
