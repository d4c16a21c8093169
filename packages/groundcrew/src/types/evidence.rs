//! Evidence snippets gathered from web search.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Claim text -> evidence, relevance-descending. Insertion order follows claim order.
pub type EvidenceMap = IndexMap<String, Vec<Evidence>>;

/// A retrieved snippet plus the page it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Source URL.
    pub source: String,

    /// Extract of the page content.
    pub snippet: String,

    /// Search-provider relevance, 0.0 to 1.0.
    #[serde(default = "default_relevance", deserialize_with = "deserialize_relevance")]
    pub relevance_score: f32,
}

fn default_relevance() -> f32 {
    Evidence::DEFAULT_RELEVANCE
}

/// Missing, null or NaN becomes the default; anything else is clamped into `[0, 1]`.
fn normalize_relevance(score: Option<f32>) -> f32 {
    match score {
        Some(s) if s.is_finite() => s.clamp(0.0, 1.0),
        _ => Evidence::DEFAULT_RELEVANCE,
    }
}

fn deserialize_relevance<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f32>::deserialize(deserializer).map(normalize_relevance)
}

impl Evidence {
    /// Score used when the provider does not return one.
    pub const DEFAULT_RELEVANCE: f32 = 0.5;

    /// Create evidence, defaulting a missing or NaN score and clamping into `[0, 1]`.
    pub fn new(source: impl Into<String>, snippet: impl Into<String>, score: Option<f32>) -> Self {
        Self {
            source: source.into(),
            snippet: snippet.into(),
            relevance_score: normalize_relevance(score),
        }
    }

    /// Same as [`Evidence::new`] but truncates the snippet to `max_chars` characters.
    pub fn truncated(
        source: impl Into<String>,
        snippet: &str,
        score: Option<f32>,
        max_chars: usize,
    ) -> Self {
        Self::new(source, truncate_chars(snippet, max_chars), score)
    }
}

/// Truncate to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
