//! Integration tests for the generation client against a mock API.

use std::time::{Duration, Instant};

use music_composer_mcp::domains::composition::{CompositionPlan, Section};
use music_composer_mcp::domains::generation::{
    GenerationClient, GenerationResult, GeneratorConfig, MusicComposer,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, max_retries: u32) -> GenerationClient {
    GenerationClient::new(GeneratorConfig {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        timeout: Duration::from_millis(200),
        max_retries,
        backoff_unit: Duration::from_millis(1),
    })
    .expect("client should build")
}

#[tokio::test]
async fn test_simple_generation_returns_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .and(header("xi-api-key", "test-key"))
        .and(body_partial_json(json!({
            "prompt": "lofi beats for studying",
            "duration_ms": 30000,
            "output_format": "mp3_44100_128"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3audio".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let result = client
        .generate_simple("lofi beats for studying", Some(30_000), "mp3_44100_128")
        .await;

    assert_eq!(
        result,
        GenerationResult::Success {
            audio: b"ID3audio".to_vec(),
            composition_plan: None,
            duration_ms: Some(30_000),
        }
    );
}

#[tokio::test]
async fn test_bad_prompt_keeps_suggestion_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "bad_prompt",
                "message": "Prompt references a copyrighted artist",
                "suggested_prompt": "dreamy indie pop with airy vocals"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let result = client
        .generate_simple("a song like a famous band", None, "mp3_44100_128")
        .await;

    assert_eq!(result.kind(), "copyright_rejected");
    assert_eq!(result.suggested_prompt(), Some("dreamy indie pop with airy vocals"));
}

#[tokio::test]
async fn test_rate_limit_retries_until_attempts_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let result = client.generate_simple("ambient rain", None, "mp3_44100_128").await;

    assert_eq!(result.kind(), "rate_limited");
}

#[tokio::test]
async fn test_no_sleep_after_final_rate_limited_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 1);
    let result = tokio::time::timeout(
        Duration::from_secs(2),
        client.generate_simple("ambient rain", None, "mp3_44100_128"),
    )
    .await
    .expect("the final attempt must not wait for Retry-After");

    assert_eq!(result.kind(), "rate_limited");
}

#[tokio::test]
async fn test_rate_limit_without_hint_uses_exponential_backoff() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let client = GenerationClient::new(GeneratorConfig {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(1),
        max_retries: 3,
        backoff_unit: Duration::from_millis(20),
    })
    .unwrap();

    let started = Instant::now();
    let result = client.generate_simple("ambient rain", None, "mp3_44100_128").await;
    let elapsed = started.elapsed();

    assert_eq!(result.kind(), "rate_limited");
    // 20 ms after the first attempt, 40 ms after the second, none after the third
    assert!(elapsed >= Duration::from_millis(60), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(2), "elapsed {elapsed:?}");
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"audio".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let result = client.generate_simple("ambient rain", None, "mp3_44100_128").await;

    assert!(result.is_success());
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let result = client.generate_simple("jazz trio", None, "mp3_44100_128").await;

    assert_eq!(result.kind(), "unauthorized");
    assert!(result.error_message().unwrap().contains("ELEVENLABS_API_KEY"));
}

#[tokio::test]
async fn test_server_error_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, 3);
    let result = client.generate_simple("jazz trio", None, "mp3_44100_128").await;

    assert_eq!(
        result,
        GenerationResult::GenericError {
            message: "API error (503): maintenance".to_string(),
            status_code: Some(503),
        }
    );
}

#[tokio::test]
async fn test_timeout_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(Duration::from_secs(2)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, 2);
    let result = client.generate_simple("slow drone", None, "mp3_44100_128").await;

    match result {
        GenerationResult::GenericError {
            message,
            status_code,
        } => {
            assert!(message.contains("after 2 attempts"), "unexpected message: {message}");
            assert_eq!(status_code, None);
        }
        other => panic!("expected a generic error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_structured_generation_sends_plan() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/music/compose"))
        .and(body_partial_json(json!({
            "strict_duration": true,
            "composition_plan": {
                "sections": [
                    { "style": "soft piano intro", "duration_ms": 10000, "mood": "calm" },
                    { "style": "full band chorus", "duration_ms": 20000, "mood": "uplifting" }
                ]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"structured".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let plan = CompositionPlan {
        sections: vec![
            Section::new("soft piano intro", 10_000, "calm"),
            Section::new("full band chorus", 20_000, "uplifting"),
        ],
        total_duration_ms: 30_000,
        overall_mood: "uplifting".to_string(),
        genre: None,
    };

    let client = client_for(&server, 3);
    let result = client.generate_structured(&plan, true, "mp3_44100_128").await;

    match result {
        GenerationResult::Success {
            audio,
            composition_plan,
            duration_ms,
        } => {
            assert_eq!(audio, b"structured".to_vec());
            assert_eq!(duration_ms, Some(30_000));
            assert_eq!(composition_plan.unwrap()["sections"].as_array().unwrap().len(), 2);
        }
        other => panic!("expected success, got {other:?}"),
    }
}
