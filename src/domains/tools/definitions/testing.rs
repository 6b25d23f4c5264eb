//! Test doubles for tool tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::core::{Config, ServerContext};
use crate::domains::composition::CompositionPlan;
use crate::domains::generation::{GenerationResult, MusicComposer};

/// Composer that replays a canned outcome and remembers what it was asked.
pub struct FakeComposer {
    outcome: GenerationResult,
    pub prompts: Mutex<Vec<String>>,
    pub plans: Mutex<Vec<CompositionPlan>>,
}

impl FakeComposer {
    pub fn returning(outcome: GenerationResult) -> Self {
        Self {
            outcome,
            prompts: Mutex::new(Vec::new()),
            plans: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding() -> Self {
        Self::returning(GenerationResult::Success {
            audio: b"ID3fake-audio".to_vec(),
            composition_plan: None,
            duration_ms: Some(30_000),
        })
    }
}

#[async_trait]
impl MusicComposer for FakeComposer {
    async fn generate_simple(
        &self,
        prompt: &str,
        _duration_ms: Option<u64>,
        _output_format: &str,
    ) -> GenerationResult {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.outcome.clone()
    }

    async fn generate_structured(
        &self,
        plan: &CompositionPlan,
        _strict_duration: bool,
        _output_format: &str,
    ) -> GenerationResult {
        self.plans.lock().unwrap().push(plan.clone());
        self.outcome.clone()
    }
}

/// Config with all storage under a fresh temporary directory.
pub fn temp_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.music_output_dir = dir.path().join("music");
    config.storage.preferences_dir = dir.path().join("preferences");
    config
}

/// Server context around a composer, with storage in a temp directory.
pub fn test_context(composer: Arc<FakeComposer>) -> (TempDir, Arc<ServerContext>) {
    let dir = TempDir::new().unwrap();
    let ctx = ServerContext::with_composer(temp_config(&dir), composer);
    (dir, Arc::new(ctx))
}
