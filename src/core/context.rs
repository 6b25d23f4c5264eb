//! Shared state handed to every tool, resource and prompt.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

use super::config::Config;
use super::error::Result;
use crate::domains::composition::CompositionPlanner;
use crate::domains::context::ContextAnalyzer;
use crate::domains::generation::{GenerationClient, GeneratorConfig, MusicComposer};
use crate::domains::library::FileManager;
use crate::domains::preferences::PreferenceStore;

/// Everything a request handler needs, built once at startup.
pub struct ServerContext {
    pub config: Config,
    pub composer: Arc<dyn MusicComposer>,
    pub library: FileManager,
    /// One lock around the store so concurrent connections cannot lose
    /// updates between the in-memory change and the rewrite on disk.
    pub preferences: Mutex<PreferenceStore>,
    pub planner: CompositionPlanner,
    pub analyzer: ContextAnalyzer,
}

impl ServerContext {
    /// Build the context with a real generation client.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let client = GenerationClient::new(generator_config(&config))?;
        Ok(Self::with_composer(config, Arc::new(client)))
    }

    /// Build the context around any composer implementation.
    pub fn with_composer(config: Config, composer: Arc<dyn MusicComposer>) -> Self {
        let preferences = if config.features.preference_learning {
            PreferenceStore::open_dir(&config.storage.preferences_dir)
        } else {
            info!("Preference learning disabled, keeping preferences in memory");
            PreferenceStore::in_memory()
        };
        let library = FileManager::new(&config.storage.music_output_dir);

        Self {
            composer,
            library,
            preferences: Mutex::new(preferences),
            planner: CompositionPlanner::new(),
            analyzer: ContextAnalyzer::new(),
            config,
        }
    }

    pub fn learning_enabled(&self) -> bool {
        self.config.features.preference_learning
    }
}

/// Generation client settings derived from the server configuration.
pub fn generator_config(config: &Config) -> GeneratorConfig {
    GeneratorConfig {
        api_key: config.credentials.elevenlabs_api_key.clone().unwrap_or_default(),
        base_url: config.api.base_url.clone(),
        timeout: Duration::from_secs(config.api.timeout_secs),
        max_retries: config.api.max_retries,
        ..GeneratorConfig::default()
    }
}
