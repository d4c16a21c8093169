//! Pure OpenAI REST API client
//!
//! A small client for the two endpoints the fact-checking pipeline needs:
//! free-text chat completions and schema-constrained structured output.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest};
//!
//! let client = OpenAIClient::new(api_key);
//!
//! let response = client.chat_completion(
//!     ChatRequest::prompt("gpt-4o-mini", "You summarize fact-checks.", "Claims: ...")
//! ).await?;
//! ```

pub mod error;
pub mod schema;
pub mod types;

pub use error::{OpenAIError, Result};
pub use schema::StructuredOutput;
pub use types::*;

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Pure OpenAI API client.
#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAIClient {
    /// Create a new OpenAI client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OpenAIError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Set a custom base URL (for Azure, proxies, local mocks).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();
        let raw = self.post_chat(&request, "chat").await?;
        let usage = raw.usage.clone();
        let content = first_content(raw)?;

        debug!(
            model = %request.model,
            tokens = usage.as_ref().map_or(0, |u| u.total_tokens),
            duration_ms = start.elapsed().as_millis() as u64,
            "OpenAI chat completion"
        );

        Ok(ChatResponse { content, usage })
    }

    /// Structured output with JSON schema.
    ///
    /// Returns the raw JSON string produced by the model.
    pub async fn structured_output(&self, request: StructuredRequest) -> Result<String> {
        let start = std::time::Instant::now();
        let raw = self.post_chat(&request, "structured output").await?;
        let content = first_content(raw)?;

        debug!(
            model = %request.model,
            schema = %request.response_format.json_schema.name,
            duration_ms = start.elapsed().as_millis() as u64,
            "OpenAI structured output"
        );

        Ok(content)
    }

    async fn post_chat<B: Serialize>(&self, body: &B, label: &str) -> Result<ChatResponseRaw> {
        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "OpenAI {} request failed", label);
                OpenAIError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "OpenAI {} error", label);
            return Err(OpenAIError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))
    }
}

fn first_content(raw: ChatResponseRaw) -> Result<String> {
    let message = raw
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or(OpenAIError::EmptyResponse)?;

    if let Some(refusal) = message.refusal {
        return Err(OpenAIError::Refusal(refusal));
    }

    message.content.ok_or(OpenAIError::EmptyResponse)
}
