use std::sync::Arc;
use std::time::Duration;

use recipebox_core::ai::{AiClient, AiConfig, AiError, ExtractError, OpenAiClient, RecipeExtractor};
use serde_json::json;
use wiremock::matchers::{bearer_token, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> AiConfig {
    let mut config = AiConfig::new("test-key");
    config.base_url = format!("{}/v1", server.uri());
    config.timeout = Duration::from_secs(5);
    config
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 120, "completion_tokens": 80, "total_tokens": 200 }
    })
}

#[tokio::test]
async fn test_extracts_draft_from_completion() {
    let server = MockServer::start().await;
    let answer = json!({
        "id": "x",
        "title": "Pancakes",
        "ingredients": "* 1 cup flour\n",
        "instructions": "1. Mix.\n2. Fry.\n",
        "cook_temp_deg_f": 0,
        "cook_time_minutes": 10,
        "tags": ["Breakfast"]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&answer)))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(config_for(&server)).unwrap();
    let extractor = RecipeExtractor::new(Arc::new(client));

    let draft = extractor
        .extract_from_text("Pancakes: mix and fry.")
        .await
        .unwrap();
    assert_eq!(draft.title, "Pancakes");
    assert_eq!(draft.cook_time_minutes, Some(10));
    assert_eq!(draft.tags, vec!["Breakfast".to_string()]);
}

#[tokio::test]
async fn test_request_body_carries_strict_schema() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{}")))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(config_for(&server)).unwrap();
    let extractor = RecipeExtractor::new(Arc::new(client));
    let _ = extractor.extract_from_text("Toast: toast bread.").await;

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["max_tokens"], 2000);
    assert_eq!(body["response_format"]["type"], "json_schema");
    assert_eq!(body["response_format"]["json_schema"]["strict"], true);
    assert_eq!(
        body["response_format"]["json_schema"]["schema"]["additionalProperties"],
        false
    );
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"][1]["text"], "Toast: toast bread.");
}

#[tokio::test]
async fn test_server_error_is_api_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "The server had an error", "type": "server_error" }
        })))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(config_for(&server)).unwrap();
    let err = client
        .complete(recipebox_core::ai::build_extract_request(
            recipebox_core::ai::ExtractionInput::Text("Toast"),
            client.model_name(),
            client.max_tokens(),
        ))
        .await
        .unwrap_err();

    match err {
        AiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "The server had an error");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let extractor = RecipeExtractor::new(Arc::new(OpenAiClient::new(config_for(&server)).unwrap()));
    let err = extractor.extract_from_text("Toast").await.unwrap_err();

    match err {
        ExtractError::Upstream(AiError::Api { status, message }) => {
            assert_eq!(status, 429);
            assert_eq!(message, "slow down");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_envelope_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let extractor = RecipeExtractor::new(Arc::new(OpenAiClient::new(config_for(&server)).unwrap()));
    let err = extractor.extract_from_text("Toast").await.unwrap_err();
    assert!(matches!(err, ExtractError::Decode(_)));
}

#[tokio::test]
async fn test_zero_choices_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let extractor = RecipeExtractor::new(Arc::new(OpenAiClient::new(config_for(&server)).unwrap()));
    let err = extractor.extract_from_text("Toast").await.unwrap_err();
    assert!(matches!(err, ExtractError::EmptyResponse));
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("{}"))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.timeout = Duration::from_millis(200);
    let extractor = RecipeExtractor::new(Arc::new(OpenAiClient::new(config).unwrap()));

    let err = extractor.extract_from_text("Toast").await.unwrap_err();
    assert!(matches!(err, ExtractError::Upstream(AiError::Request(_))));
}
