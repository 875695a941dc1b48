//! Mock provider for testing.

use super::{FinishReason, InlineImage, ProviderError, ProviderResponse, VisionProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// A request the mock has seen.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub prompt: String,
    pub image: InlineImage,
}

/// Mock vision provider returning a canned reply.
pub struct MockVisionProvider {
    reply: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockVisionProvider {
    /// Every call succeeds with `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with a network error.
    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn generate(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                prompt: prompt.to_string(),
                image: image.clone(),
            });
        }

        match &self.reply {
            Some(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as i32 / 4,
                output_tokens: text.len() as i32 / 4,
                finish_reason: FinishReason::Complete,
            }),
            None => Err(ProviderError::NetworkError(
                "Mock vision provider configured to fail".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.reply {
            Some(_) => Ok(()),
            None => Err(ProviderError::NotConfigured(
                "Mock vision provider configured to fail".to_string(),
            )),
        }
    }
}
