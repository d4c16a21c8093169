//! Page scraper implementations.

#[cfg(feature = "firecrawl")]
mod firecrawl;

#[cfg(feature = "firecrawl")]
pub use firecrawl::FirecrawlScraper;
