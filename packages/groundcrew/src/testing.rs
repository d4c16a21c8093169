//! Testing utilities including mock implementations.
//!
//! These are useful for testing code built on the fact-checking pipeline
//! without making real LLM, search or scrape calls. Every mock is
//! deterministic and records the calls it receives.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{GroundCrewError, Result};
use crate::traits::{
    llm::{GenerationRequest, LanguageModel},
    observer::{PipelineObserver, StageEvent},
    scraper::{PageScraper, ScrapedPage},
    searcher::{SearchHit, SearchRequest, WebSearcher},
};

#[derive(Debug, Clone)]
enum MockResponse {
    Json(String),
    Fail(String),
}

#[derive(Debug, Clone)]
struct MockRule {
    schema: String,
    /// Only match when the user prompt contains this text.
    contains: Option<String>,
    response: MockResponse,
}

/// A mock language model for testing.
///
/// Structured responses are keyed by schema name (`ClaimsList`,
/// `SearchQueries`, `EvidenceCompletenessCheck`, `VerdictOutput`) and
/// optionally by a substring of the user prompt. Rules with a substring win
/// over schema-wide rules. Without a rule, each schema has a neutral default:
/// no claims, no queries, complete evidence, and a `not_enough_info` verdict
/// at 0.5 confidence.
#[derive(Default, Clone)]
pub struct MockLanguageModel {
    rules: Arc<RwLock<Vec<MockRule>>>,

    /// Report text (or failure) for `complete`
    report: Arc<RwLock<Option<MockResponse>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockLlmCall>>>,
}

/// Record of a call made to the mock language model.
#[derive(Debug, Clone, PartialEq)]
pub enum MockLlmCall {
    Generate { schema: String, user: String },
    Complete { user: String },
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_rule(self, schema: &str, contains: Option<&str>, response: MockResponse) -> Self {
        self.rules.write().unwrap().push(MockRule {
            schema: schema.to_string(),
            contains: contains.map(str::to_string),
            response,
        });
        self
    }

    /// Raw JSON for a schema, optionally only when the prompt contains `contains`.
    pub fn with_json(self, schema: &str, contains: Option<&str>, json: impl Into<String>) -> Self {
        self.push_rule(schema, contains, MockResponse::Json(json.into()))
    }

    /// Fail every call for a schema.
    pub fn fail_schema(self, schema: &str, message: impl Into<String>) -> Self {
        self.push_rule(schema, None, MockResponse::Fail(message.into()))
    }

    /// Fail calls for a schema whose prompt contains `contains`.
    pub fn fail_schema_for(
        self,
        schema: &str,
        contains: &str,
        message: impl Into<String>,
    ) -> Self {
        self.push_rule(schema, Some(contains), MockResponse::Fail(message.into()))
    }

    /// Claims returned by the extractor, as `(text, priority)`.
    pub fn with_claims(self, claims: &[(&str, i64)]) -> Self {
        let claims: Vec<_> = claims
            .iter()
            .map(|(text, priority)| json!({ "text": text, "priority": priority }))
            .collect();
        self.with_json("ClaimsList", None, json!({ "claims": claims }).to_string())
    }

    /// Search queries generated for the claim containing `claim`.
    pub fn with_queries(self, claim: &str, queries: &[&str]) -> Self {
        self.with_json(
            "SearchQueries",
            Some(claim),
            json!({ "queries": queries }).to_string(),
        )
    }

    /// Completeness check result for the claim containing `claim`.
    pub fn with_completeness(
        self,
        claim: &str,
        is_complete: bool,
        score: f32,
        missing: &[&str],
    ) -> Self {
        self.with_json(
            "EvidenceCompletenessCheck",
            Some(claim),
            json!({
                "is_complete": is_complete,
                "completeness_score": score,
                "missing_elements": missing,
            })
            .to_string(),
        )
    }

    /// Verdict for the claim containing `claim`. `status` is passed through
    /// unchecked so invalid labels can be tested.
    pub fn with_verdict(
        self,
        claim: &str,
        status: &str,
        confidence: f32,
        justification: &str,
    ) -> Self {
        self.with_json(
            "VerdictOutput",
            Some(claim),
            json!({
                "status": status,
                "confidence": confidence,
                "justification": justification,
            })
            .to_string(),
        )
    }

    /// Text returned by `complete`.
    pub fn with_report(self, report: impl Into<String>) -> Self {
        *self.report.write().unwrap() = Some(MockResponse::Json(report.into()));
        self
    }

    /// Make `complete` fail.
    pub fn fail_report(self, message: impl Into<String>) -> Self {
        *self.report.write().unwrap() = Some(MockResponse::Fail(message.into()));
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockLlmCall> {
        self.calls.read().unwrap().clone()
    }

    /// Number of structured calls made for `schema`.
    pub fn generation_count(&self, schema: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockLlmCall::Generate { schema: s, .. } if s == schema))
            .count()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn lookup(&self, schema: &str, user: &str) -> Option<MockResponse> {
        let rules = self.rules.read().unwrap();
        let specific = rules.iter().find(|r| {
            r.schema == schema
                && r.contains
                    .as_deref()
                    .is_some_and(|needle| user.contains(needle))
        });
        let generic = || {
            rules
                .iter()
                .find(|r| r.schema == schema && r.contains.is_none())
        };
        specific.or_else(generic).map(|r| r.response.clone())
    }

    fn default_json(schema: &str) -> Option<String> {
        let value = match schema {
            "ClaimsList" => json!({ "claims": [] }),
            "SearchQueries" => json!({ "queries": [] }),
            "EvidenceCompletenessCheck" => json!({
                "is_complete": true,
                "completeness_score": 1.0,
                "missing_elements": [],
            }),
            "VerdictOutput" => json!({
                "status": "not_enough_info",
                "confidence": 0.5,
                "justification": "Mock verdict",
            }),
            _ => return None,
        };
        Some(value.to_string())
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn generate_json(&self, request: &GenerationRequest) -> Result<String> {
        self.calls.write().unwrap().push(MockLlmCall::Generate {
            schema: request.schema_name.clone(),
            user: request.user.clone(),
        });

        match self.lookup(&request.schema_name, &request.user) {
            Some(MockResponse::Json(json)) => Ok(json),
            Some(MockResponse::Fail(message)) => Err(GroundCrewError::Llm(message.into())),
            None => Self::default_json(&request.schema_name).ok_or_else(|| {
                GroundCrewError::Llm(
                    format!("no mock response for schema {}", request.schema_name).into(),
                )
            }),
        }
    }

    async fn complete(&self, _system: &str, user: &str) -> Result<String> {
        self.calls.write().unwrap().push(MockLlmCall::Complete {
            user: user.to_string(),
        });

        match self.report.read().unwrap().clone() {
            Some(MockResponse::Json(text)) => Ok(text),
            Some(MockResponse::Fail(message)) => Err(GroundCrewError::Llm(message.into())),
            None => Ok("Mock fact-check report.".to_string()),
        }
    }
}

/// A mock web searcher for testing.
///
/// Hits are keyed by a substring of the query; unmatched queries get the
/// default hits (empty unless set).
#[derive(Default, Clone)]
pub struct MockWebSearcher {
    results: Arc<RwLock<Vec<(String, Vec<SearchHit>)>>>,
    default_hits: Arc<RwLock<Vec<SearchHit>>>,
    failures: Arc<RwLock<Vec<String>>>,
    calls: Arc<RwLock<Vec<SearchRequest>>>,
}

impl MockWebSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hits for queries containing `query`.
    pub fn with_results(self, query: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        self.results.write().unwrap().push((query.into(), hits));
        self
    }

    /// Hits for any query without a specific entry.
    pub fn with_default_results(self, hits: Vec<SearchHit>) -> Self {
        *self.default_hits.write().unwrap() = hits;
        self
    }

    /// Fail queries containing `query`.
    pub fn fail_query(self, query: impl Into<String>) -> Self {
        self.failures.write().unwrap().push(query.into());
        self
    }

    /// Get all requests made to this mock.
    pub fn calls(&self) -> Vec<SearchRequest> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockWebSearcher {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        self.calls.write().unwrap().push(request.clone());

        if self
            .failures
            .read()
            .unwrap()
            .iter()
            .any(|f| request.query.contains(f.as_str()))
        {
            return Err(GroundCrewError::Search(
                format!("mock search failure for {:?}", request.query).into(),
            ));
        }

        let hits = self
            .results
            .read()
            .unwrap()
            .iter()
            .find(|(key, _)| request.query.contains(key.as_str()))
            .map(|(_, hits)| hits.clone())
            .unwrap_or_else(|| self.default_hits.read().unwrap().clone());

        Ok(hits.into_iter().take(request.max_results).collect())
    }
}

/// A mock page scraper for testing.
#[derive(Default, Clone)]
pub struct MockScraper {
    pages: Arc<RwLock<HashMap<String, ScrapedPage>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `url`. Unknown URLs fail.
    pub fn with_page(self, url: impl Into<String>, content: impl Into<String>) -> Self {
        let url = url.into();
        self.pages.write().unwrap().insert(
            url.clone(),
            ScrapedPage {
                url,
                title: None,
                content: content.into(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageScraper for MockScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        self.calls.write().unwrap().push(url.to_string());
        self.pages
            .read()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| GroundCrewError::Scrape(format!("mock page not found: {}", url).into()))
    }
}

/// Observer that keeps every event for later assertions.
#[derive(Default)]
pub struct RecordingObserver {
    events: RwLock<Vec<StageEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<StageEvent> {
        self.events.read().unwrap().clone()
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &StageEvent) {
        self.events.write().unwrap().push(event.clone());
    }
}
