use super::*;
use crate::key_pool::KeyPoolError;
use std::time::Duration;
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

const IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

fn analyzer_for(server: &MockServer, keys: &[&str]) -> GeminiAnalyzer {
    let client =
        GeminiClient::with_base_url(server.uri(), Duration::from_secs(5), Duration::from_secs(5))
            .unwrap();
    GeminiAnalyzer::new(client, Arc::new(KeyPool::new(keys.iter().copied())))
}

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    }))
}

#[test]
fn test_build_request_shape() {
    let client = GeminiClient::new().unwrap();
    let analyzer = GeminiAnalyzer::new(client, Arc::new(KeyPool::new(["k1"])));
    let request = analyzer.build_request(
        PromptStyle::Technical,
        InlineData {
            mime_type: "image/png".to_string(),
            data: "AAAA".to_string(),
        },
    );

    let json = serde_json::to_value(&request).unwrap();
    let parts = &json["contents"][0]["parts"];
    assert_eq!(json["contents"][0]["role"], "user");
    assert!(parts[0]["text"].as_str().unwrap().contains("TECHNICAL FOCUS"));
    assert_eq!(parts[1]["inline_data"]["mime_type"], "image/png");
    assert_eq!(json["generationConfig"]["maxOutputTokens"], 400);
}

#[tokio::test]
async fn test_describe_cleans_output() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(reply("Here is a   misty harbor at dawn"))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server, &["k1"]);
    let prompt = analyzer.describe(IMAGE, "creative").await.unwrap();
    assert_eq!(
        prompt,
        "Highly detailed, professional quality, A misty harbor at dawn."
    );
}

#[tokio::test]
async fn test_keys_rotate_and_usage_recorded() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .and(matchers::query_param("key", "k1"))
        .respond_with(reply("one, detailed"))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(matchers::method("POST"))
        .and(matchers::query_param("key", "k2"))
        .respond_with(reply("two, detailed"))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server, &["k1", "k2"]);
    assert_eq!(analyzer.describe(IMAGE, "").await.unwrap(), "One, detailed.");
    assert_eq!(analyzer.describe(IMAGE, "").await.unwrap(), "Two, detailed.");
    assert_eq!(analyzer.describe(IMAGE, "").await.unwrap(), "One, detailed.");

    let snapshot = analyzer.keys().snapshot();
    assert_eq!(snapshot[0].request_count, 2);
    assert_eq!(snapshot[1].request_count, 1);
    assert!(snapshot[0].last_used.is_some());
}

#[tokio::test]
async fn test_usage_recorded_on_api_error() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server, &["k1"]);
    let err = analyzer.describe(IMAGE, "creative").await.unwrap_err();
    assert!(matches!(err, GeminiError::Api { status: 500, .. }));
    assert_eq!(analyzer.keys().snapshot()[0].request_count, 1);
}

#[tokio::test]
async fn test_empty_candidates() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"candidates": []}"#))
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server, &["k1"]);
    let err = analyzer.analyze(IMAGE, "creative").await.unwrap_err();
    assert_eq!(err.message(), "No response generated from Gemini API");
}

#[tokio::test]
async fn test_no_keys() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("POST"))
        .respond_with(reply("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server, &[]);
    let err = analyzer.describe(IMAGE, "creative").await.unwrap_err();
    assert!(matches!(err, GeminiError::KeyPool(KeyPoolError::NoKeys)));
}

#[tokio::test]
async fn test_image_fetch_failure_skips_api() {
    let server = MockServer::start().await;

    Mock::given(matchers::method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(matchers::method("POST"))
        .respond_with(reply("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let analyzer = analyzer_for(&server, &["k1"]);
    let source = format!("{}/gone.jpg", server.uri());
    let err = analyzer.analyze(&source, "creative").await.unwrap_err();
    assert!(err.message().contains("HTTP 404"));
}
