//! HTTP client for an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use pitch_core::generation::Prompt;
use serde::Deserialize;

use crate::error::GenerationError;
use crate::generation::{Completion, TextCompletionClient, Usage};

/// Default request timeout for completion calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for the completion endpoint.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    /// Full URL of the chat-completions endpoint.
    pub api_url: String,
    /// Bearer key. Calls fail with an upstream error when unset.
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

/// Errors from the completion HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum CompletionApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Completion API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Completion API key is not configured")]
    MissingKey,

    #[error("Completion response had no choices")]
    EmptyResponse,
}

impl From<CompletionApiError> for GenerationError {
    fn from(err: CompletionApiError) -> Self {
        GenerationError::Upstream(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

pub struct HttpCompletionClient {
    client: reqwest::Client,
    config: CompletionConfig,
}

impl HttpCompletionClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionApiError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn chat(&self, prompt: &Prompt) -> Result<Completion, CompletionApiError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(CompletionApiError::MissingKey)?;

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": prompt.max_tokens,
            "temperature": 0.7,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let parsed: ChatResponse = response.json().await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(CompletionApiError::EmptyResponse)?;

        Ok(Completion {
            text,
            usage: parsed.usage,
        })
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CompletionApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CompletionApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TextCompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, GenerationError> {
        Ok(self.chat(prompt).await?)
    }
}
