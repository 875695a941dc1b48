//! Gemini wire format, checked against a wiremock server.

mod common;

use calculator_service::config::{CalculatorConfig, GeminiSettings, ScratchSettings};
use calculator_service::services::providers::gemini::{GeminiConfig, GeminiVisionProvider};
use calculator_service::services::providers::{InlineImage, ProviderError, VisionProvider};
use calculator_service::startup::Application;
use common::{data_uri, http_settings, scratch_is_empty, FAKE_PNG};
use secrecy::Secret;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "gemini-1.5-flash";
const API_KEY: &str = "test-api-key";
const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

fn provider(server: &MockServer) -> GeminiVisionProvider {
    GeminiVisionProvider::new(GeminiConfig {
        api_key: Secret::new(API_KEY.to_string()),
        model: MODEL.to_string(),
        api_base: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to build Gemini provider")
}

fn image() -> InlineImage {
    InlineImage {
        mime_type: "image/png".to_string(),
        data: "aGVsbG8=".to_string(),
    }
}

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 812, "candidatesTokenCount": 24 }
    })
}

#[tokio::test]
async fn generate_sends_prompt_and_inline_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("[]")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server)
        .generate("solve this", &image())
        .await
        .expect("generate failed");

    assert_eq!(response.text, "[]");
    assert_eq!(response.input_tokens, 812);
    assert_eq!(response.output_tokens, 24);

    let requests = server.received_requests().await.expect("recording disabled");
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], "solve this");
    assert_eq!(parts[1]["inline_data"]["mimeType"], "image/png");
    assert_eq!(parts[1]["inline_data"]["data"], "aGVsbG8=");
}

#[tokio::test]
async fn text_parts_are_concatenated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "[{\"expr\": \"1+1\", " }, { "text": "\"result\": \"2\"}]" }] },
                "finishReason": "STOP"
            }]
        })))
        .mount(&server)
        .await;

    let response = provider(&server).generate("p", &image()).await.unwrap();
    assert_eq!(response.text, r#"[{"expr": "1+1", "result": "2"}]"#);
}

#[tokio::test]
async fn rate_limit_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = provider(&server).generate("p", &image()).await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .mount(&server)
        .await;

    let err = provider(&server).generate("p", &image()).await.unwrap_err();
    match err {
        ProviderError::ApiError(msg) => assert!(msg.contains("backend exploded")),
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn safety_block_is_content_filtered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&server)
        .await;

    let err = provider(&server).generate("p", &image()).await.unwrap_err();
    assert!(matches!(err, ProviderError::ContentFiltered));
}

#[tokio::test]
async fn empty_candidates_are_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = provider(&server).generate("p", &image()).await.unwrap_err();
    assert!(matches!(err, ProviderError::EmptyResponse));
}

#[tokio::test]
async fn health_check_fetches_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models/gemini-1.5-flash"))
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "models/gemini-1.5-flash" })))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server).health_check().await.expect("health check failed");
}

#[tokio::test]
async fn health_check_requires_api_key() {
    let provider = GeminiVisionProvider::new(GeminiConfig {
        api_key: Secret::new(String::new()),
        model: MODEL.to_string(),
        api_base: "http://127.0.0.1:9".to_string(),
        timeout: Duration::from_secs(1),
    })
    .unwrap();

    let err = provider.health_check().await.unwrap_err();
    assert!(matches!(err, ProviderError::NotConfigured(_)));
}

/// Full request path: HTTP server, scratch file, Gemini call, parsing.
#[tokio::test]
async fn calculate_end_to_end_against_stubbed_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_reply(
            "```json\n[{\"expr\": \"y\", \"result\": \"5\", \"assign\": true}, {\"expr\": \"y + 1\", \"result\": \"6\"}]\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let scratch = tempfile::tempdir().unwrap();
    let config = CalculatorConfig {
        common: service_core::config::Config {
            port: 0,
            environment: "test".to_string(),
        },
        gemini: GeminiSettings {
            api_key: Secret::new(API_KEY.to_string()),
            model: MODEL.to_string(),
            api_base: server.uri(),
            timeout_secs: 5,
        },
        http: http_settings(),
        scratch: ScratchSettings {
            root: scratch.path().to_path_buf(),
        },
    };

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    let response = reqwest::Client::new()
        .post(format!("http://127.0.0.1:{}/calculate", port))
        .json(&json!({
            "image": data_uri("image/png", FAKE_PNG),
            "dict_of_vars": { "y": "5" }
        }))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["data"],
        json!([
            {"expr": "y", "result": "5", "assign": true},
            {"expr": "y + 1", "result": "6", "assign": false}
        ])
    );
    assert!(scratch_is_empty(scratch.path()));

    let requests = server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains(r#"{"y":"5"}"#));
}
