//! End-to-end tool flow against a mock music API.

use std::sync::Arc;
use std::time::Duration;

use music_composer_mcp::core::{Config, ServerContext};
use music_composer_mcp::domains::generation::{GenerationClient, GeneratorConfig};
use music_composer_mcp::domains::tools::definitions::{
    GenerateMusicSimpleTool, GenerateSimpleParams, GetMusicRecommendationsTool,
    RecommendationParams, RecordFeedbackParams, RecordMusicFeedbackTool,
};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context(server: &MockServer, dir: &TempDir) -> ServerContext {
    let mut config = Config::default();
    config.storage.music_output_dir = dir.path().join("music");
    config.storage.preferences_dir = dir.path().join("preferences");

    let client = GenerationClient::new(GeneratorConfig {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        max_retries: 2,
        backoff_unit: Duration::from_millis(1),
    })
    .unwrap();

    ServerContext::with_composer(config, Arc::new(client))
}

#[tokio::test]
async fn test_generate_save_and_learn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-generated-track".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(&server, &dir);

    let params: GenerateSimpleParams = serde_json::from_value(json!({
        "prompt": "Chill lofi beats for coding",
        "duration_ms": 30000,
        "metadata": { "activity": "coding", "mood": "calm" }
    }))
    .unwrap();
    let result = GenerateMusicSimpleTool::execute(&params, &ctx).await;
    assert_eq!(result.is_error, Some(false));

    let output = result.structured_content.unwrap();
    let audio_path = output["audio_path"].as_str().unwrap();
    assert!(audio_path.contains("chill_lofi_beats_for_coding"));
    assert_eq!(std::fs::read(audio_path).unwrap(), b"ID3-generated-track");

    let metadata: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output["metadata_path"].as_str().unwrap()).unwrap())
            .unwrap();
    assert_eq!(metadata["prompt"], "Chill lofi beats for coding");
    assert_eq!(metadata["file_size_bytes"], 19);

    // the generation itself counts as a like
    let params: RecommendationParams =
        serde_json::from_value(json!({ "activity": "coding" })).unwrap();
    let result = GetMusicRecommendationsTool::execute(&params, &ctx).await;
    assert_eq!(
        result.structured_content.unwrap()["recommendations"],
        json!(["Chill lofi beats for coding"])
    );
}

#[tokio::test]
async fn test_copyright_rejection_is_a_tool_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "bad_prompt",
                "message": "Mentions a trademarked band",
                "suggested_prompt": "British invasion rock with jangly guitars"
            }
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let ctx = context(&server, &dir);

    let params: GenerateSimpleParams =
        serde_json::from_value(json!({ "prompt": "Sounds exactly like the Beatles" })).unwrap();
    let result = GenerateMusicSimpleTool::execute(&params, &ctx).await;

    assert_eq!(result.is_error, Some(true));
    assert!(!dir.path().join("music").exists());
}

#[tokio::test]
async fn test_feedback_persists_across_contexts() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    {
        let ctx = context(&server, &dir);
        let params: RecordFeedbackParams = serde_json::from_value(json!({
            "prompt": "Epic orchestral workout anthem",
            "feedback": "replay",
            "activity": "exercising"
        }))
        .unwrap();
        let result = RecordMusicFeedbackTool::execute(&params, &ctx).await;
        assert_eq!(result.is_error, Some(false));
    }

    let ctx = context(&server, &dir);
    let params: RecommendationParams =
        serde_json::from_value(json!({ "activity": "exercising" })).unwrap();
    let result = GetMusicRecommendationsTool::execute(&params, &ctx).await;
    let output = result.structured_content.unwrap();
    assert_eq!(output["recommendations"], json!(["Epic orchestral workout anthem"]));
    assert_eq!(output["total_preferences"], 1);
}
