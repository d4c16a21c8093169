//! Errors returned by [`OpenAIClient`](crate::OpenAIClient).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OpenAIError>;

#[derive(Debug, Error)]
pub enum OpenAIError {
    /// The HTTP client could not be built.
    #[error("client configuration error: {0}")]
    Config(String),

    /// No response: connection refused, DNS failure, timeout.
    #[error("request failed: {0}")]
    Network(String),

    /// Non-2xx response.
    #[error("OpenAI returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A 2xx response without a usable message.
    #[error("OpenAI returned no content")]
    EmptyResponse,

    /// The body or the model output did not deserialize.
    #[error("could not parse response: {0}")]
    Parse(String),

    /// The model declined to produce the requested structured output.
    #[error("model refused: {0}")]
    Refusal(String),
}

impl OpenAIError {
    /// Whether the failure happened before a response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Rate limited (HTTP 429); worth retrying with fewer workers.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::Api { status: 429, .. })
    }
}
