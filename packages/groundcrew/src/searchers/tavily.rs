//! Tavily-powered web search.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GroundCrewError, Result};
use crate::security::SecretString;
use crate::traits::searcher::{SearchHit, SearchRequest, WebSearcher};

const TAVILY_API_URL: &str = "https://api.tavily.com";

/// Tavily search request.
#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    query: &'a str,
    search_depth: &'static str,
    max_results: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    include_domains: Vec<String>,
}

/// Tavily search response.
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

/// A single Tavily search result.
#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: Option<f64>,
}

impl From<TavilyResult> for SearchHit {
    fn from(r: TavilyResult) -> Self {
        SearchHit {
            url: r.url,
            title: r.title,
            content: r.content,
            score: r.score.map(|s| s as f32),
        }
    }
}

/// Web searcher backed by the Tavily API.
pub struct TavilySearcher {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl TavilySearcher {
    /// Create a new Tavily searcher.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::new(api_key),
            base_url: TAVILY_API_URL.to_string(),
        }
    }

    /// Create a searcher whose requests time out after `timeout`.
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GroundCrewError::Search(Box::new(e)))?;
        Ok(Self {
            client,
            ..Self::new(api_key)
        })
    }

    /// Point at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for TavilySearcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TavilySearcher")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl WebSearcher for TavilySearcher {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>> {
        let body = TavilyRequest {
            query: &request.query,
            search_depth: request.depth.as_str(),
            max_results: request.max_results,
            include_domains: request.include_domains.clone(),
        };

        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&body)
            .send()
            .await
            .map_err(|e| GroundCrewError::Search(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Tavily API error");
            return Err(GroundCrewError::Search(
                format!("Tavily API error ({}): {}", status, error_text).into(),
            ));
        }

        let tavily_response: TavilyResponse = response
            .json()
            .await
            .map_err(|e| GroundCrewError::Search(Box::new(e)))?;

        debug!(
            query = %request.query,
            results = tavily_response.results.len(),
            "Tavily search"
        );

        Ok(tavily_response
            .results
            .into_iter()
            .map(SearchHit::from)
            .collect())
    }
}
