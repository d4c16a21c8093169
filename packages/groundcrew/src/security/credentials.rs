//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate to prevent accidental logging of sensitive values.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::ConfigError;

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    /// Create a new secret string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this when actually using the secret (e.g., in an API request).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whether the secret is blank.
    pub fn is_empty(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// API keys for the external providers the pipeline talks to.
///
/// Passed explicitly into the pipeline; nothing inside the library reads the
/// environment on its own.
#[derive(Clone)]
pub struct ProviderCredentials {
    /// OpenAI API key (LLM calls)
    pub openai_api_key: SecretString,

    /// Tavily API key (web search)
    pub tavily_api_key: SecretString,

    /// Firecrawl API key (URL scraping, optional)
    pub firecrawl_api_key: Option<SecretString>,
}

impl ProviderCredentials {
    /// Create credentials for the LLM and search providers.
    pub fn new(openai_api_key: impl Into<String>, tavily_api_key: impl Into<String>) -> Self {
        Self {
            openai_api_key: SecretString::new(openai_api_key),
            tavily_api_key: SecretString::new(tavily_api_key),
            firecrawl_api_key: None,
        }
    }

    /// Add a Firecrawl key for `--url` scraping.
    pub fn with_firecrawl(mut self, api_key: impl Into<String>) -> Self {
        self.firecrawl_api_key = Some(SecretString::new(api_key));
        self
    }

    /// Read `OPENAI_API_KEY`, `TAVILY_API_KEY` and optional `FIRECRAWL_API_KEY`.
    ///
    /// Intended for binaries; call `dotenvy::dotenv()` first if `.env` files
    /// should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingCredential(name))
        };

        let mut credentials = Self::new(required("OPENAI_API_KEY")?, required("TAVILY_API_KEY")?);
        if let Ok(key) = std::env::var("FIRECRAWL_API_KEY") {
            if !key.trim().is_empty() {
                credentials = credentials.with_firecrawl(key);
            }
        }
        Ok(credentials)
    }

    /// The Firecrawl key, or an error naming the missing variable.
    pub fn require_firecrawl(&self) -> Result<&SecretString, ConfigError> {
        self.firecrawl_api_key
            .as_ref()
            .ok_or(ConfigError::MissingCredential("FIRECRAWL_API_KEY"))
    }
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("openai_api_key", &"[REDACTED]")
            .field("tavily_api_key", &"[REDACTED]")
            .field(
                "firecrawl_api_key",
                &self.firecrawl_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
