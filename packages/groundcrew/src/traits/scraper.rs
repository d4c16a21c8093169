//! Page scraper trait: turn a URL into text before fact-checking it.

use async_trait::async_trait;

use crate::error::Result;

/// A fetched page, already converted to markdown or plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedPage {
    pub url: String,
    pub title: Option<String>,
    pub content: String,
}

#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedPage>;
}
