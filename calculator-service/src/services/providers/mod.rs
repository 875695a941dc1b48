//! Vision model provider abstraction.
//!
//! The analyzer only talks to [`VisionProvider`], so the Gemini backend can be
//! swapped for the mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Image attached to a generation request.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    /// Standard base64 encoding of the image bytes.
    pub data: String,
}

/// Result of a provider response.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub input_tokens: i32,
    pub output_tokens: i32,
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Trait for multimodal (text + image in, text out) providers.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Generate a text response for the prompt and image.
    async fn generate(
        &self,
        prompt: &str,
        image: &InlineImage,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
