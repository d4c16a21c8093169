//! Claims extracted from input text.

use serde::{Deserialize, Serialize};

/// An atomic factual statement that can be checked against evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// The claim as a standalone sentence.
    pub text: String,

    /// Check-worthiness, 1 (low) to 10 (high).
    #[serde(default = "default_priority")]
    pub priority: u8,
}

fn default_priority() -> u8 {
    Claim::DEFAULT_PRIORITY
}

impl Claim {
    pub const MIN_PRIORITY: u8 = 1;
    pub const MAX_PRIORITY: u8 = 10;
    pub const DEFAULT_PRIORITY: u8 = 5;

    /// Create a claim, clamping the priority into `1..=10`.
    pub fn new(text: impl Into<String>, priority: i64) -> Self {
        let clamped = priority.clamp(Self::MIN_PRIORITY as i64, Self::MAX_PRIORITY as i64);
        Self {
            text: text.into(),
            priority: clamped as u8,
        }
    }

    /// Create a claim with the default priority.
    pub fn with_default_priority(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            priority: Self::DEFAULT_PRIORITY,
        }
    }
}
