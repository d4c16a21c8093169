//! Data model for the fact-checking pipeline.

pub mod claim;
pub mod config;
pub mod evidence;
pub mod state;
pub mod verdict;

pub use claim::Claim;
pub use config::{FactCheckConfig, SearchDepth, VerificationPolicy, WIKIPEDIA_DOMAIN};
pub use evidence::{truncate_chars, Evidence, EvidenceMap};
pub use state::{PipelineStage, PipelineState, PipelineStep};
pub use verdict::{Confidence, FeverLabel, Verdict, VerdictStatus};
