//! Firecrawl-based page scraper.
//!
//! Uses the Firecrawl API to render a page (JavaScript included) and return
//! its main content as markdown.
//!
//! Requires the `firecrawl` feature to be enabled.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{GroundCrewError, Result};
use crate::security::SecretString;
use crate::traits::scraper::{PageScraper, ScrapedPage};

const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

// Request/Response types for Firecrawl API

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
    #[serde(rename = "onlyMainContent")]
    only_main_content: bool,
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapeData>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct ScrapeData {
    markdown: Option<String>,
    metadata: Option<PageMetadata>,
}

#[derive(Deserialize)]
struct PageMetadata {
    title: Option<String>,
    #[serde(rename = "sourceURL")]
    source_url: Option<String>,
}

/// Page scraper backed by the Firecrawl API.
///
/// ```rust,ignore
/// use groundcrew::scrapers::FirecrawlScraper;
///
/// let scraper = FirecrawlScraper::new(api_key)?;
/// let page = scraper.scrape("https://example.com/article").await?;
/// ```
pub struct FirecrawlScraper {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl FirecrawlScraper {
    /// Create a scraper with a 120 second request timeout.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, Duration::from_secs(120))
    }

    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GroundCrewError::Scrape(Box::new(e)))?;

        Ok(Self {
            client,
            api_key: SecretString::new(api_key),
            base_url: FIRECRAWL_API_URL.to_string(),
        })
    }

    /// Point at a different endpoint (self-hosted Firecrawl, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for FirecrawlScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirecrawlScraper")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn into_page(requested_url: &str, response: ScrapeResponse) -> Result<ScrapedPage> {
    if !response.success {
        let reason = response
            .error
            .unwrap_or_else(|| "Firecrawl reported failure".to_string());
        return Err(GroundCrewError::Scrape(reason.into()));
    }

    let data = response
        .data
        .ok_or_else(|| GroundCrewError::Scrape("Firecrawl returned no data".into()))?;

    let content = data.markdown.unwrap_or_default();
    if content.trim().is_empty() {
        return Err(GroundCrewError::Scrape(
            format!("no content extracted from {}", requested_url).into(),
        ));
    }

    let (title, source_url) = match data.metadata {
        Some(meta) => (meta.title, meta.source_url),
        None => (None, None),
    };

    Ok(ScrapedPage {
        url: source_url.unwrap_or_else(|| requested_url.to_string()),
        title,
        content,
    })
}

#[async_trait]
impl PageScraper for FirecrawlScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        let request = ScrapeRequest {
            url,
            formats: ["markdown"],
            only_main_content: true,
        };

        let response = self
            .client
            .post(format!("{}/scrape", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .json(&request)
            .send()
            .await
            .map_err(|e| GroundCrewError::Scrape(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(url = %url, status = %status, "Firecrawl scrape failed");
            return Err(GroundCrewError::Scrape(
                format!("Firecrawl error ({}): {}", status, error_text).into(),
            ));
        }

        let body: ScrapeResponse = response
            .json()
            .await
            .map_err(|e| GroundCrewError::Scrape(Box::new(e)))?;

        let page = into_page(url, body)?;
        debug!(url = %page.url, chars = page.content.len(), "Scraped page");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ScrapeResponse {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_successful_response_becomes_page() {
        let response = parse(
            r##"{"success": true, "data": {"markdown": "# Title\nBody", "metadata": {"title": "Title", "sourceURL": "https://example.com/a"}}}"##,
        );
        let page = into_page("https://example.com/a?ref=x", response).unwrap();
        assert_eq!(page.url, "https://example.com/a");
        assert_eq!(page.title.as_deref(), Some("Title"));
        assert!(page.content.contains("Body"));
    }

    #[test]
    fn test_failure_and_empty_content_are_errors() {
        let failed = parse(r#"{"success": false, "error": "blocked"}"#);
        let err = into_page("https://example.com", failed).unwrap_err();
        assert!(err.to_string().contains("blocked"));

        let empty = parse(r#"{"success": true, "data": {"markdown": "   "}}"#);
        assert!(matches!(
            into_page("https://example.com", empty),
            Err(GroundCrewError::Scrape(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let request = ScrapeRequest {
            url: "https://example.com",
            formats: ["markdown"],
            only_main_content: true,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["formats"][0], "markdown");
        assert_eq!(json["onlyMainContent"], true);
    }
}
