//! Language model trait for the pipeline's LLM calls.
//!
//! Two capabilities are needed:
//! - Schema-constrained generation (claims, queries, verdicts)
//! - Free-text completion (the final report)
//!
//! Typed generation is layered on top by [`StructuredGeneration`], which
//! derives the schema from the target type and validates the parsed value,
//! so backends only ever deal in JSON strings.

use async_trait::async_trait;
use openai_client::{strip_code_blocks, StructuredOutput};

use crate::error::{Result, ValidationError};

/// A schema-constrained generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Name of the output type (e.g. `ClaimsList`).
    pub schema_name: String,

    /// Strict-mode JSON schema the output must match.
    pub schema: serde_json::Value,

    pub system: String,
    pub user: String,
}

impl GenerationRequest {
    /// Build a request whose schema is derived from `T`.
    pub fn for_type<T: StructuredOutput>(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            schema_name: T::type_name(),
            schema: T::openai_schema(),
            system: system.into(),
            user: user.into(),
        }
    }
}

/// LLM backend.
///
/// Implementations wrap a specific provider and own their model name and
/// sampling settings.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Return a JSON document matching `request.schema`.
    async fn generate_json(&self, request: &GenerationRequest) -> Result<String>;

    /// Free-text completion.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Post-parse checks for structured outputs.
pub trait Validate {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        Ok(())
    }
}

/// Typed generation on top of any [`LanguageModel`].
#[async_trait]
pub trait StructuredGeneration: LanguageModel {
    /// Generate, parse and validate a `T`.
    ///
    /// Parse and validation failures come back as `GroundCrewError::Validation`.
    async fn generate<T>(&self, system: &str, user: &str) -> Result<T>
    where
        T: StructuredOutput + Validate + Send;
}

#[async_trait]
impl<L: LanguageModel + ?Sized> StructuredGeneration for L {
    async fn generate<T>(&self, system: &str, user: &str) -> Result<T>
    where
        T: StructuredOutput + Validate + Send,
    {
        let request = GenerationRequest::for_type::<T>(system, user);
        let raw = self.generate_json(&request).await?;

        let value: T = serde_json::from_str(strip_code_blocks(&raw)).map_err(|e| {
            ValidationError::Schema {
                type_name: request.schema_name.clone(),
                reason: e.to_string(),
            }
        })?;
        value.validate()?;
        Ok(value)
    }
}
