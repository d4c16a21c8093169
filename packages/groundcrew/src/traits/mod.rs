//! Core trait abstractions for the fact-checking pipeline.
//!
//! - [`LanguageModel`] - LLM calls (structured and free text)
//! - [`WebSearcher`] - evidence search
//! - [`PageScraper`] - URL to text
//! - [`PipelineObserver`] - per-step telemetry

pub mod llm;
pub mod observer;
pub mod scraper;
pub mod searcher;

pub use llm::{GenerationRequest, LanguageModel, StructuredGeneration, Validate};
pub use observer::{PipelineObserver, StageEvent, TracingObserver};
pub use scraper::{PageScraper, ScrapedPage};
pub use searcher::{SearchHit, SearchRequest, WebSearcher};
