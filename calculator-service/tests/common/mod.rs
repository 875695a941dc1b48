#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use calculator_service::config::HttpSettings;
use calculator_service::services::providers::VisionProvider;
use calculator_service::services::ScratchSpace;
use calculator_service::startup::{build_router, AppState};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower::util::ServiceExt;

/// A few bytes standing in for a PNG; the service never decodes pixels.
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-canvas";

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

pub fn http_settings() -> HttpSettings {
    HttpSettings {
        max_body_bytes: 10 * 1024 * 1024,
        cors_origins: Vec::new(),
    }
}

pub async fn test_router(provider: Arc<dyn VisionProvider>, scratch_root: &Path) -> Router {
    let scratch = ScratchSpace::new(scratch_root)
        .await
        .expect("Failed to create scratch space");
    build_router(AppState::new(provider, scratch), &http_settings())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn post_json(router: Router, uri: &str, body: String) -> TestResponse {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    into_test_response(response).await
}

pub async fn get(router: Router, uri: &str) -> TestResponse {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    into_test_response(response).await
}

async fn into_test_response(response: axum::response::Response) -> TestResponse {
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn scratch_is_empty(root: &Path) -> bool {
    std::fs::read_dir(root)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(true)
}
