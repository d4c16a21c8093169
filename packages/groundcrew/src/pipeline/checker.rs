//! The fact-checking pipeline runner.
//!
//! ```rust,ignore
//! use groundcrew::{FactChecker, FactCheckConfig};
//! use groundcrew::ai::OpenAiModel;
//! use groundcrew::searchers::TavilySearcher;
//!
//! let checker = FactChecker::new(
//!     OpenAiModel::new(openai_key),
//!     TavilySearcher::new(tavily_key),
//!     FactCheckConfig::default(),
//! );
//! let state = checker.run("The Eiffel Tower is 330 metres tall.").await;
//! println!("{}", state.final_report);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::extract::extract_claims;
use super::report::generate_report;
use super::retrieve::retrieve_evidence;
use super::verify::verify_claims;
use crate::ai::OpenAiModel;
use crate::searchers::TavilySearcher;
use crate::security::ProviderCredentials;
use crate::traits::llm::LanguageModel;
use crate::traits::observer::{PipelineObserver, StageEvent, TracingObserver};
use crate::traits::scraper::PageScraper;
use crate::traits::searcher::WebSearcher;
use crate::types::{FactCheckConfig, PipelineState, PipelineStep};

/// Runs extraction, retrieval, verification and reporting in sequence.
///
/// `run` never fails: stage errors are recorded on the returned state.
pub struct FactChecker<L, S> {
    llm: L,
    searcher: S,
    config: FactCheckConfig,
    observers: Vec<Arc<dyn PipelineObserver>>,
    metadata: BTreeMap<String, String>,
}

impl<L, S> FactChecker<L, S>
where
    L: LanguageModel,
    S: WebSearcher,
{
    /// Create a checker. Events are logged through [`TracingObserver`].
    pub fn new(llm: L, searcher: S, config: FactCheckConfig) -> Self {
        Self {
            llm,
            searcher,
            config,
            observers: vec![Arc::new(TracingObserver)],
            metadata: BTreeMap::new(),
        }
    }

    /// Add an observer for stage events.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Metadata copied onto every state this checker produces.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn config(&self) -> &FactCheckConfig {
        &self.config
    }

    pub fn llm(&self) -> &L {
        &self.llm
    }

    pub fn searcher(&self) -> &S {
        &self.searcher
    }

    /// Fact-check `input`.
    pub async fn run(&self, input: &str) -> PipelineState {
        self.run_with_metadata(input, BTreeMap::new()).await
    }

    /// Fact-check `input` with extra per-run metadata (overrides checker metadata).
    pub async fn run_with_metadata(
        &self,
        input: &str,
        extra: BTreeMap<String, String>,
    ) -> PipelineState {
        let run_id = Uuid::new_v4();
        let mut metadata = self.metadata.clone();
        metadata.extend(extra);
        let state = PipelineState::new(input).with_metadata(metadata);

        self.run_state(run_id, state)
            .instrument(info_span!("fact_check", run_id = %run_id))
            .await
    }

    async fn run_state(&self, run_id: Uuid, mut state: PipelineState) -> PipelineState {
        let started = Instant::now();
        info!(chars = state.input_text.len(), model = %self.config.model_name, "Starting fact check");

        let (t, errors) = (Instant::now(), error_len(&state));
        state = extract_claims(&self.llm, state).await;
        self.emit(run_id, PipelineStep::ExtractClaims, &state, t, errors);

        let (t, errors) = (Instant::now(), error_len(&state));
        state = retrieve_evidence(&self.llm, &self.searcher, &self.config, state).await;
        self.emit(run_id, PipelineStep::RetrieveEvidence, &state, t, errors);

        let (t, errors) = (Instant::now(), error_len(&state));
        state = verify_claims(&self.llm, &self.config, state).await;
        self.emit(run_id, PipelineStep::VerifyClaims, &state, t, errors);

        let (t, errors) = (Instant::now(), error_len(&state));
        state = generate_report(&self.llm, state).await;
        self.emit(run_id, PipelineStep::GenerateReport, &state, t, errors);

        info!(
            stage = ?state.stage,
            claims = state.claims.len(),
            verdicts = state.verdicts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fact check complete"
        );
        state
    }

    fn emit(
        &self,
        run_id: Uuid,
        step: PipelineStep,
        state: &PipelineState,
        started: Instant,
        errors_before: usize,
    ) {
        let event = StageEvent {
            run_id,
            step,
            stage: state.stage,
            claims: state.claims.len(),
            evidence: state.evidence_count(),
            verdicts: state.verdicts.len(),
            elapsed_ms: started.elapsed().as_millis() as u64,
            step_failed: error_len(state) != errors_before,
            metadata: state.metadata.clone(),
        };
        for observer in &self.observers {
            observer.on_event(&event);
        }
    }
}

fn error_len(state: &PipelineState) -> usize {
    state.error.as_ref().map_or(0, String::len)
}

/// Scrape `url` and fact-check its content.
///
/// An invalid URL or a failed scrape yields a state with `error` set and no
/// claims. The page URL and title are added to the metadata.
pub async fn fetch_and_check<P, L, S>(
    url: &str,
    scraper: &P,
    checker: &FactChecker<L, S>,
) -> PipelineState
where
    P: PageScraper + ?Sized,
    L: LanguageModel,
    S: WebSearcher,
{
    let failed = |message: String| {
        let mut metadata = checker.metadata.clone();
        metadata.insert("source_url".to_string(), url.to_string());
        let mut state = PipelineState::new("").with_metadata(metadata);
        state.record_error(PipelineStep::FetchSource, message);
        state
    };

    if let Err(e) = url::Url::parse(url) {
        return failed(format!("invalid URL {:?}: {}", url, e));
    }

    match scraper.scrape(url).await {
        Ok(page) => {
            info!(url = %page.url, chars = page.content.len(), "Fetched source page");
            let mut extra = BTreeMap::new();
            extra.insert("source_url".to_string(), page.url.clone());
            if let Some(title) = page.title {
                extra.insert("source_title".to_string(), title);
            }
            checker.run_with_metadata(&page.content, extra).await
        }
        Err(e) => failed(format!("failed to fetch {}: {}", url, e)),
    }
}

impl FactChecker<OpenAiModel, TavilySearcher> {
    /// Build a checker on OpenAI and Tavily with the given config.
    pub fn from_credentials(credentials: &ProviderCredentials, config: FactCheckConfig) -> Self {
        let llm = OpenAiModel::new(credentials.openai_api_key.expose())
            .with_model(config.model_name.clone())
            .with_temperature(config.temperature);
        let searcher = TavilySearcher::new(credentials.tavily_api_key.expose());
        Self::new(llm, searcher, config)
    }
}

/// One-shot fact check with the balanced preset.
///
/// `model_name` overrides the preset's model when given.
pub async fn run_fact_check(
    input_text: &str,
    credentials: &ProviderCredentials,
    model_name: Option<&str>,
    metadata: Option<BTreeMap<String, String>>,
) -> PipelineState {
    let mut config = FactCheckConfig::balanced();
    if let Some(model) = model_name {
        config = config.with_model(model);
    }

    FactChecker::from_credentials(credentials, config)
        .run_with_metadata(input_text, metadata.unwrap_or_default())
        .await
}
