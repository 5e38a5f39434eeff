//! Crawler module for website discovery, fetching and extraction
//!
//! This module contains the core crawl-and-extract pipeline, including:
//! - HTTP fetching with per-request timeouts
//! - Sitemap discovery with homepage fallback
//! - Readable-text extraction from HTML
//! - Overall crawl coordination

mod coordinator;
mod extract;
mod fetcher;
mod report;
mod sitemap;

pub use coordinator::Scraper;
pub use extract::{extract, normalize_text, ExtractedText};
pub use fetcher::{
    build_http_client, FetchError, Fetcher, ACCEPT_HEADER, MAX_REDIRECTS, PAGE_TIMEOUT,
    SITEMAP_TIMEOUT,
};
pub use report::{ScrapeReport, ScrapedPage, DEFAULT_MAX_PAGES, MIN_TEXT_CHARS};
pub use sitemap::{assemble_targets, parse_sitemap, SitemapDiscoverer, SitemapDocument, SitemapError};

use crate::config::Config;
use crate::CorpusError;

/// Runs a complete crawl of one website
///
/// This is the main entry point for a one-off crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Discover targets from the site's sitemap
/// 3. Fetch and extract each target
/// 4. Return the targets and the pages with usable text
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `website` - The business website, with or without a scheme
///
/// # Returns
///
/// * `Ok(ScrapeReport)` - Crawl finished (pages may be empty)
/// * `Err(CorpusError)` - The HTTP client could not be built
pub async fn crawl(config: &Config, website: &str) -> Result<ScrapeReport, CorpusError> {
    let scraper = Scraper::from_config(config)?;
    Ok(scraper.run(website, config.crawler.max_pages).await)
}
