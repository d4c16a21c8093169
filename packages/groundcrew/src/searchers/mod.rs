//! Web searcher implementations.

mod tavily;

pub use tavily::TavilySearcher;
