//! Automated fact-checking pipeline
//!
//! Takes free text, pulls out the factual claims, searches the web for
//! evidence on each, classifies every claim against its evidence and writes
//! a report.
//!
//! # Pipeline
//!
//! ```text
//! input text -> extract claims -> retrieve evidence -> verify -> report
//! ```
//!
//! Every stage takes a [`PipelineState`] by value and returns it with its
//! own fields filled in. Stage failures never abort a run: they are recorded
//! in `state.error` and the stage falls back to a safe default.
//!
//! # Usage
//!
//! ```rust,ignore
//! use groundcrew::{FactChecker, FactCheckConfig};
//! use groundcrew::testing::{MockLanguageModel, MockWebSearcher};
//!
//! let llm = MockLanguageModel::new().with_claims(&[("The Earth is round.", 9)]);
//! let checker = FactChecker::new(llm, MockWebSearcher::new(), FactCheckConfig::default());
//!
//! let state = checker.run("The Earth is round.").await;
//! for verdict in &state.verdicts {
//!     println!("{}: {}", verdict.claim, verdict.status);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Provider abstractions (LanguageModel, WebSearcher, PageScraper)
//! - [`types`] - Claims, evidence, verdicts, state and configuration
//! - [`pipeline`] - The four stages and the [`FactChecker`] runner
//! - [`eval`] - FEVER-style benchmark harness
//! - [`ai`], [`searchers`], [`scrapers`] - OpenAI, Tavily and Firecrawl providers
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod ai;
pub mod error;
pub mod eval;
pub mod pipeline;
pub mod scrapers;
pub mod searchers;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ConfigError, GroundCrewError, Result, ValidationError};
pub use pipeline::{fetch_and_check, render_plain_report, run_fact_check, FactChecker};
pub use security::{ProviderCredentials, SecretString};
pub use traits::{
    GenerationRequest, LanguageModel, PageScraper, PipelineObserver, ScrapedPage, SearchHit,
    SearchRequest, StageEvent, StructuredGeneration, TracingObserver, Validate, WebSearcher,
};
pub use types::{
    Claim, Confidence, Evidence, EvidenceMap, FactCheckConfig, FeverLabel, PipelineStage,
    PipelineState, PipelineStep, SearchDepth, Verdict, VerdictStatus, VerificationPolicy,
};

