//! Fact-checking pipeline - the core of the library.
//!
//! Four stages run in a fixed order, each taking the [`PipelineState`] by
//! value and returning it with its own fields filled in:
//! - [`extract_claims`] - input text to prioritized claims
//! - [`retrieve_evidence`] - search queries and ranked evidence per claim
//! - [`verify_claims`] - a verdict per claim
//! - [`generate_report`] - human-readable summary
//!
//! [`FactChecker`] wires them together with telemetry.
//!
//! [`PipelineState`]: crate::types::PipelineState

pub mod checker;
pub mod extract;
pub mod prompts;
pub mod report;
pub mod retrieve;
pub mod verify;

pub use checker::{fetch_and_check, run_fact_check, FactChecker};
pub use extract::{extract_claims, normalize_claims, ClaimCandidate, ClaimsList};
pub use report::{generate_report, render_plain_report};
pub use retrieve::{hits_to_evidence, rank_evidence, retrieve_evidence, SearchQueries};
pub use verify::{
    verify_claim, verify_claims, EvidenceCompletenessCheck, VerdictOutput,
    NO_EVIDENCE_JUSTIFICATION,
};

