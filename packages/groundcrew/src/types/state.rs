//! Pipeline state threaded through the four stages.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::claim::Claim;
use super::evidence::EvidenceMap;
use super::verdict::{Verdict, VerdictStatus};

/// How far a run has progressed.
///
/// Ordered: a state only ever moves to a later variant. `Failed` sorts last
/// and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Init,
    ClaimsExtracted,
    EvidenceGathered,
    Verified,
    Reported,
    Failed,
}

impl PipelineStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineStage::Reported | PipelineStage::Failed)
    }
}

/// Pipeline steps, used to label errors and observer events.
///
/// `FetchSource` only runs when checking a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStep {
    FetchSource,
    ExtractClaims,
    RetrieveEvidence,
    VerifyClaims,
    GenerateReport,
}

impl PipelineStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::FetchSource => "source fetch",
            PipelineStep::ExtractClaims => "claim extraction",
            PipelineStep::RetrieveEvidence => "evidence retrieval",
            PipelineStep::VerifyClaims => "verification",
            PipelineStep::GenerateReport => "report generation",
        }
    }

    /// Stage reached once this step has run.
    pub fn completes(&self) -> PipelineStage {
        match self {
            PipelineStep::FetchSource => PipelineStage::Init,
            PipelineStep::ExtractClaims => PipelineStage::ClaimsExtracted,
            PipelineStep::RetrieveEvidence => PipelineStage::EvidenceGathered,
            PipelineStep::VerifyClaims => PipelineStage::Verified,
            PipelineStep::GenerateReport => PipelineStage::Reported,
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a run has produced so far.
///
/// Each stage takes the state by value and hands it back with its own fields
/// filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    pub input_text: String,

    #[serde(default)]
    pub claims: Vec<Claim>,

    #[serde(default)]
    pub evidence_map: EvidenceMap,

    #[serde(default)]
    pub verdicts: Vec<Verdict>,

    #[serde(default)]
    pub final_report: String,

    /// Non-fatal errors, `"; "`-joined, each prefixed with its step.
    #[serde(default)]
    pub error: Option<String>,

    pub stage: PipelineStage,

    /// Caller-supplied tags carried through unchanged.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl PipelineState {
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            claims: Vec::new(),
            evidence_map: EvidenceMap::new(),
            verdicts: Vec::new(),
            final_report: String::new(),
            error: None,
            stage: PipelineStage::Init,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Move forward to `next`. Never moves backwards or out of `Failed`.
    pub fn advance(&mut self, next: PipelineStage) {
        if self.stage != PipelineStage::Failed && next > self.stage {
            self.stage = next;
        }
    }

    /// Append an error for `step` and mark the run failed.
    pub fn record_error(&mut self, step: PipelineStep, message: impl fmt::Display) {
        let entry = format!("{}: {}", step, message);
        self.error = Some(match self.error.take() {
            Some(existing) => format!("{}; {}", existing, entry),
            None => entry,
        });
        self.stage = PipelineStage::Failed;
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Total evidence items across all claims.
    pub fn evidence_count(&self) -> usize {
        self.evidence_map.values().map(Vec::len).sum()
    }

    /// Number of verdicts with the given status.
    pub fn count_status(&self, status: VerdictStatus) -> usize {
        self.verdicts.iter().filter(|v| v.status == status).count()
    }
}
