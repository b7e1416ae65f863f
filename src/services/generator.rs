use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when generating text
///
/// These never leave the narrative generator; they are turned into a
/// fallback narrative there.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Text generation API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {status} - {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Empty response from text generation API")]
    EmptyResponse,

    #[error("Text generation timed out after {0:?}")]
    Timeout(Duration),
}

/// External text generation collaborator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a chat with one system and one user message
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
    ) -> Result<String, GenerationError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
