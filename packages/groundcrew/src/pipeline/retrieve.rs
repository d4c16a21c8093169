//! Evidence retrieval: search queries per claim, hits ranked into evidence.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::prompts::{format_search_queries_prompt, SEARCH_QUERIES_SYSTEM};
use crate::traits::llm::{LanguageModel, StructuredGeneration, Validate};
use crate::traits::searcher::{SearchHit, SearchRequest, WebSearcher};
use crate::types::{Evidence, FactCheckConfig, PipelineState, PipelineStep};

/// Structured output of the query-generation call.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchQueries {
    /// One to three web search queries.
    pub queries: Vec<String>,
}

impl Validate for SearchQueries {}

/// Sort by relevance (stable), keep the first hit per URL, cap at `max`.
pub fn rank_evidence(mut evidence: Vec<Evidence>, max: usize) -> Vec<Evidence> {
    evidence.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

    let mut seen = HashSet::new();
    evidence.retain(|ev| seen.insert(ev.source.clone()));
    evidence.truncate(max);
    evidence
}

/// Convert raw hits, skipping those without a URL.
pub fn hits_to_evidence(hits: Vec<SearchHit>, snippet_max_length: usize) -> Vec<Evidence> {
    hits.into_iter()
        .filter(|hit| !hit.url.trim().is_empty())
        .map(|hit| Evidence::truncated(hit.url, &hit.content, hit.score, snippet_max_length))
        .collect()
}

/// Run the evidence retriever over every claim.
///
/// Failed query generation falls back to the claim text; failed searches are
/// recorded and skipped. A claim with no hits gets an empty list.
pub async fn retrieve_evidence<L, S>(
    llm: &L,
    searcher: &S,
    config: &FactCheckConfig,
    mut state: PipelineState,
) -> PipelineState
where
    L: LanguageModel + ?Sized,
    S: WebSearcher + ?Sized,
{
    let claims: Vec<String> = state.claims.iter().map(|c| c.text.clone()).collect();

    for claim in claims {
        if state.evidence_map.contains_key(&claim) {
            continue;
        }
        if claim.trim().is_empty() {
            state.evidence_map.insert(claim, Vec::new());
            continue;
        }

        let queries = generate_queries(llm, &claim, config, &mut state).await;
        let mut collected = Vec::new();

        for query in &queries {
            let mut request = SearchRequest::new(query.as_str(), config.max_search_results_per_query)
                .with_depth(config.search_depth);
            if let Some(domain) = &config.evidence_domain {
                request = request.with_domain(domain.as_str());
            }

            match searcher.search(&request).await {
                Ok(hits) => {
                    debug!(query = %query, hits = hits.len(), "Search complete");
                    collected.extend(hits_to_evidence(hits, config.snippet_max_length));
                }
                Err(e) => {
                    warn!(query = %query, error = %e, "Search failed, skipping query");
                    state.record_error(
                        PipelineStep::RetrieveEvidence,
                        format!("search for {:?} failed: {}", query, e),
                    );
                }
            }
        }

        let ranked = rank_evidence(collected, config.max_evidence_per_claim);
        debug!(claim = %claim, evidence = ranked.len(), "Evidence gathered");
        state.evidence_map.insert(claim, ranked);
    }

    info!(
        claims = state.evidence_map.len(),
        evidence = state.evidence_count(),
        "Retrieved evidence"
    );
    state.advance(PipelineStep::RetrieveEvidence.completes());
    state
}

async fn generate_queries<L>(
    llm: &L,
    claim: &str,
    config: &FactCheckConfig,
    state: &mut PipelineState,
) -> Vec<String>
where
    L: LanguageModel + ?Sized,
{
    let prompt = format_search_queries_prompt(claim);
    let mut queries: Vec<String> = match llm
        .generate::<SearchQueries>(SEARCH_QUERIES_SYSTEM, &prompt)
        .await
    {
        Ok(result) => result
            .queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect(),
        Err(e) => {
            warn!(claim = %claim, error = %e, "Query generation failed, searching the claim text");
            state.record_error(
                PipelineStep::RetrieveEvidence,
                format!("query generation failed: {}", e),
            );
            Vec::new()
        }
    };

    if queries.is_empty() {
        queries.push(claim.to_string());
    }
    queries.truncate(config.max_queries_per_claim);
    queries
}
