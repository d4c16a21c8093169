//! Verdicts: the classification outcome for a claim.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::evidence::Evidence;
use crate::error::ValidationError;

/// Veracity label assigned to a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Supported,
    Refuted,
    Mixed,
    NotEnoughInfo,
}

impl VerdictStatus {
    pub const ALL: [VerdictStatus; 4] = [
        VerdictStatus::Supported,
        VerdictStatus::Refuted,
        VerdictStatus::Mixed,
        VerdictStatus::NotEnoughInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictStatus::Supported => "supported",
            VerdictStatus::Refuted => "refuted",
            VerdictStatus::Mixed => "mixed",
            VerdictStatus::NotEnoughInfo => "not_enough_info",
        }
    }

    /// Collapse onto the three FEVER labels. `mixed` counts as not enough info.
    pub fn to_fever_label(&self) -> FeverLabel {
        match self {
            VerdictStatus::Supported => FeverLabel::Supports,
            VerdictStatus::Refuted => FeverLabel::Refutes,
            VerdictStatus::Mixed | VerdictStatus::NotEnoughInfo => FeverLabel::NotEnoughInfo,
        }
    }
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerdictStatus {
    type Err = ValidationError;

    /// Accepts the snake_case labels and the FEVER spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "supported" | "supports" => Ok(VerdictStatus::Supported),
            "refuted" | "refutes" => Ok(VerdictStatus::Refuted),
            "mixed" => Ok(VerdictStatus::Mixed),
            "not_enough_info" => Ok(VerdictStatus::NotEnoughInfo),
            _ => Err(ValidationError::UnknownLabel(s.to_string())),
        }
    }
}

/// FEVER benchmark labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FeverLabel {
    #[serde(rename = "SUPPORTS")]
    Supports,
    #[serde(rename = "REFUTES")]
    Refutes,
    #[serde(rename = "NOT ENOUGH INFO")]
    NotEnoughInfo,
}

impl FeverLabel {
    pub const ALL: [FeverLabel; 3] = [
        FeverLabel::Supports,
        FeverLabel::Refutes,
        FeverLabel::NotEnoughInfo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeverLabel::Supports => "SUPPORTS",
            FeverLabel::Refutes => "REFUTES",
            FeverLabel::NotEnoughInfo => "NOT ENOUGH INFO",
        }
    }

    /// Integer encoding used by some FEVER dumps: 0, 1, 2.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(FeverLabel::Supports),
            1 => Some(FeverLabel::Refutes),
            2 => Some(FeverLabel::NotEnoughInfo),
            _ => None,
        }
    }
}

impl fmt::Display for FeverLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeverLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status: VerdictStatus = s.parse()?;
        if status == VerdictStatus::Mixed {
            return Err(ValidationError::UnknownLabel(s.to_string()));
        }
        Ok(status.to_fever_label())
    }
}

/// Model confidence, validated to lie in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Confidence(f32);

impl Confidence {
    pub const ZERO: Confidence = Confidence(0.0);

    pub fn new(value: f32) -> Result<Self, ValidationError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::ConfidenceOutOfRange(value))
        }
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Rounded percentage, e.g. `0.856` -> `86`.
    pub fn percent(&self) -> u32 {
        (self.0 * 100.0).round() as u32
    }
}

impl TryFrom<f32> for Confidence {
    type Error = ValidationError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f32 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Classification of one claim against its evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub claim: String,
    pub status: VerdictStatus,
    pub confidence: Confidence,
    pub justification: String,
    #[serde(default)]
    pub evidence_used: Vec<Evidence>,
}

impl Verdict {
    /// A `not_enough_info` verdict.
    pub fn not_enough_info(
        claim: impl Into<String>,
        confidence: Confidence,
        justification: impl Into<String>,
        evidence_used: Vec<Evidence>,
    ) -> Self {
        Self {
            claim: claim.into(),
            status: VerdictStatus::NotEnoughInfo,
            confidence,
            justification: justification.into(),
            evidence_used,
        }
    }
}
