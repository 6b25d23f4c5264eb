//! Configuration management for the music composer server.
//!
//! Defaults are overlaid by environment variables (a `.env` file is loaded
//! first when present). Generation settings use the `ELEVENLABS_` names the
//! API is known by; server settings use the `MCP_` prefix.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::domains::generation::{
    DEFAULT_BASE_URL, DEFAULT_MAX_RETRIES, DEFAULT_OUTPUT_FORMAT, DEFAULT_TIMEOUT_SECS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub transport: TransportConfig,
    pub credentials: CredentialsConfig,
    /// Generation API connection settings.
    pub api: ApiConfig,
    /// Generation request defaults and bounds.
    pub generation: GenerationConfig,
    pub storage: StorageConfig,
    pub features: FeaturesConfig,
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Secrets for the generation API.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(skip_serializing)]
    pub elevenlabs_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "elevenlabs_api_key",
                &self.elevenlabs_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Total attempts per generation request.
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub default_output_format: String,
    pub default_duration_ms: u64,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the generated music library.
    pub music_output_dir: PathBuf,
    /// Directory holding `preferences.json`.
    pub preferences_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Record generations and feedback to disk.
    pub preference_learning: bool,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory that user-supplied paths must stay under.
    /// If None, no path restrictions are enforced.
    pub root_path: Option<PathBuf>,

    /// Whether symlinks may be followed (targets are still validated).
    pub allow_symlinks: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
            default_duration_ms: 60_000,
            min_duration_ms: 3_000,
            max_duration_ms: 300_000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Music")
            .join("ElevenLabs");
        Self {
            music_output_dir: root.join("generated"),
            preferences_dir: root.join("preferences"),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            preference_learning: true,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "music-composer".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            api: ApiConfig::default(),
            generation: GenerationConfig::default(),
            storage: StorageConfig::default(),
            features: FeaturesConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }
        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        match std::env::var("ELEVENLABS_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                config.credentials.elevenlabs_api_key = Some(key);
                info!("ElevenLabs API key loaded from environment");
            }
            _ => warn!("ELEVENLABS_API_KEY not set - music generation will be rejected by the API"),
        }

        if let Ok(url) = std::env::var("ELEVENLABS_API_URL") {
            config.api.base_url = url;
        }
        if let Some(secs) = env_parse("MCP_API_TIMEOUT_SECS") {
            config.api.timeout_secs = secs;
        }
        if let Some(retries) = env_parse("MCP_API_MAX_RETRIES") {
            config.api.max_retries = retries;
        }
        if let Some(duration) = env_parse("MCP_DEFAULT_DURATION_MS") {
            config.generation.default_duration_ms = duration;
        }

        if let Ok(dir) = std::env::var("MUSIC_OUTPUT_DIR") {
            config.storage.music_output_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("MCP_PREFERENCES_DIR") {
            config.storage.preferences_dir = PathBuf::from(dir);
        }

        if let Ok(flag) = std::env::var("ENABLE_PREFERENCE_LEARNING") {
            config.features.preference_learning = flag.eq_ignore_ascii_case("true") || flag == "1";
            info!("Preference learning enabled: {}", config.features.preference_learning);
        }

        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
            info!("Path security enabled: root directory set to {:?}", config.security.root_path);
        } else {
            warn!("MCP_ROOT_PATH not set - preference import/export paths are unrestricted");
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
            info!("Symlinks allowed: {}", config.security.allow_symlinks);
        }

        config
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        let generation = &self.generation;
        if generation.min_duration_ms > generation.max_duration_ms {
            return Err(Error::config(format!(
                "min duration {}ms exceeds max duration {}ms",
                generation.min_duration_ms, generation.max_duration_ms
            )));
        }
        if !(generation.min_duration_ms..=generation.max_duration_ms)
            .contains(&generation.default_duration_ms)
        {
            return Err(Error::config(format!(
                "default duration {}ms outside {}..={}ms",
                generation.default_duration_ms, generation.min_duration_ms, generation.max_duration_ms
            )));
        }
        if self.api.max_retries == 0 {
            return Err(Error::config("max retries must be at least 1"));
        }
        if self.api.timeout_secs == 0 {
            return Err(Error::config("API timeout must be at least 1 second"));
        }
        Ok(())
    }

    /// Check a requested duration against the configured bounds.
    pub fn check_duration(&self, duration_ms: u64) -> std::result::Result<(), String> {
        let generation = &self.generation;
        if duration_ms < generation.min_duration_ms {
            return Err(format!(
                "Duration must be at least {}ms ({} seconds)",
                generation.min_duration_ms,
                generation.min_duration_ms / 1000
            ));
        }
        if duration_ms > generation.max_duration_ms {
            return Err(format!(
                "Duration cannot exceed {}ms ({} seconds)",
                generation.max_duration_ms,
                generation.max_duration_ms / 1000
            ));
        }
        Ok(())
    }
}

pub(crate) fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {:?}", name, raw);
            None
        }
    }
}

/// Serialises tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
