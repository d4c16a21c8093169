//! Web searcher trait for evidence retrieval.
//!
//! Abstracts over search providers (Tavily, SerpAPI, etc.). The retriever
//! issues one request per generated query and turns hits into evidence.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::SearchDepth;

/// A single search call.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: usize,
    pub depth: SearchDepth,

    /// Only return results from these domains (empty = any).
    pub include_domains: Vec<String>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
            depth: SearchDepth::default(),
            include_domains: Vec::new(),
        }
    }

    pub fn with_depth(mut self, depth: SearchDepth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.include_domains.push(domain.into());
        self
    }
}

/// A result returned by a search provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub url: String,
    pub title: Option<String>,

    /// Page extract relevant to the query.
    pub content: String,

    /// Relevance score (0.0-1.0, if provided by the search API).
    pub score: Option<f32>,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            content: content.into(),
            score: None,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// Web search provider.
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>>;
}
