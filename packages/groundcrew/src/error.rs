//! Typed errors for the fact-checking library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Pipeline stages catch these
//! and record them on the state; only provider and helper calls return them.

use thiserror::Error;

/// Errors that can occur while talking to providers or validating their output.
#[derive(Debug, Error)]
pub enum GroundCrewError {
    /// LLM provider unavailable or failed
    #[error("LLM error: {0}")]
    Llm(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Web search provider failed
    #[error("search error: {0}")]
    Search(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Page scraping provider failed
    #[error("scrape error: {0}")]
    Scrape(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider output violated the structured-output contract
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration error
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed evaluation dataset
    #[error("dataset error at line {line}: {reason}")]
    Dataset { line: usize, reason: String },
}

/// Structured-output contract violations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Confidence outside `[0.0, 1.0]` (or NaN)
    #[error("confidence {0} is outside [0, 1]")]
    ConfidenceOutOfRange(f32),

    /// Score outside `[0.0, 1.0]` (or NaN)
    #[error("{field} {value} is outside [0, 1]")]
    ScoreOutOfRange { field: &'static str, value: f32 },

    /// Verdict label not in the four recognised labels
    #[error("unknown verdict label: {0:?}")]
    UnknownLabel(String),

    /// Required text field is blank
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Response did not match the requested schema
    #[error("response does not match {type_name} schema: {reason}")]
    Schema { type_name: String, reason: String },
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Numeric option outside its allowed range
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: String,
        min: String,
        max: String,
    },

    /// Unrecognised search depth
    #[error("invalid search depth {0:?} (expected \"basic\" or \"advanced\")")]
    InvalidSearchDepth(String),

    /// Unrecognised preset name
    #[error("unknown preset {0:?} (expected balanced, quality or fast)")]
    UnknownPreset(String),

    /// Required text option is blank
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// Credential missing from the environment
    #[error("{0} is not set")]
    MissingCredential(&'static str),
}

impl ConfigError {
    pub(crate) fn out_of_range<T: std::fmt::Display>(
        field: &'static str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

/// Result type alias for fact-checking operations.
pub type Result<T> = std::result::Result<T, GroundCrewError>;
