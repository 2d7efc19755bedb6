//! AI client for OpenAI-compatible chat-completion APIs.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Instant;
use thiserror::Error;

use super::config::AiConfig;
use super::types::{ChatCompletion, ChatRequest};

#[derive(Error, Debug)]
pub enum AiError {
    #[error("API request failed: {0}")]
    Request(String),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

/// Trait for AI clients.
///
/// One call to `complete` is one outbound request. Implementations do not
/// retry or cache.
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, AiError>;

    /// Model name requests should be made against.
    fn model_name(&self) -> &str;

    /// Completion token limit for requests.
    fn max_tokens(&self) -> u32;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Error response body of the completion API.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

/// Client for `POST {base_url}/chat/completions`.
#[derive(Debug)]
pub struct OpenAiClient {
    config: AiConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: AiConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl AiClient for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, AiError> {
        tracing::debug!(
            model = %request.model,
            parts = request.messages.iter().map(|m| m.content.len()).sum::<usize>(),
            "Calling AI API"
        );
        let started = Instant::now();

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "AI API responded"
        );

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(error_response) => error_response.error.message,
                Err(_) => body,
            };
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| AiError::Parse(e.to_string()))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    fn max_tokens(&self) -> u32 {
        self.config.max_tokens
    }
}
