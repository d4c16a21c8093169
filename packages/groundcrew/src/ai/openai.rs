//! OpenAI implementation of the [`LanguageModel`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use groundcrew::ai::OpenAiModel;
//!
//! let llm = OpenAiModel::new("sk-...").with_model("gpt-4o").with_temperature(0.0);
//! let checker = FactChecker::new(llm, searcher, FactCheckConfig::default());
//! ```

use std::time::Duration;

use async_trait::async_trait;
use openai_client::{ChatRequest, OpenAIClient, StructuredRequest};
use tracing::debug;

use crate::error::{GroundCrewError, Result};
use crate::traits::llm::{GenerationRequest, LanguageModel};

/// OpenAI-backed language model.
#[derive(Debug, Clone)]
pub struct OpenAiModel {
    client: OpenAIClient,
    model: String,
    temperature: f32,
    seed: Option<u64>,
}

impl OpenAiModel {
    /// Create a model with the default client (gpt-4o-mini, temperature 0).
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::from_client(OpenAIClient::new(api_key))
    }

    /// Create a model whose HTTP requests time out after `timeout`.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = OpenAIClient::with_timeout(api_key, timeout)
            .map_err(|e| GroundCrewError::Llm(Box::new(e)))?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: OpenAIClient) -> Self {
        Self {
            client,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            seed: None,
        }
    }

    /// Set the chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Ask the API for repeatable sampling across identical requests.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(url);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<String> {
        let mut structured = StructuredRequest::new(
            &self.model,
            &request.system,
            &request.user,
            request.schema.clone(),
        )
        .with_temperature(self.temperature)
        .with_schema_name(&request.schema_name);
        if let Some(seed) = self.seed {
            structured = structured.with_seed(seed);
        }

        debug!(model = %self.model, schema = %request.schema_name, "Structured generation");

        self.client
            .structured_output(structured)
            .await
            .map_err(|e| GroundCrewError::Llm(Box::new(e)))
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let mut request =
            ChatRequest::prompt(self.model.as_str(), system, user).temperature(self.temperature);
        if let Some(seed) = self.seed {
            request = request.seed(seed);
        }

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| GroundCrewError::Llm(Box::new(e)))?;

        Ok(response.content)
    }
}
