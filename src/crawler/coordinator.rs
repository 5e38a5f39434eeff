//! Crawler coordinator - main crawl orchestration logic
//!
//! This module ties the pipeline together:
//! - Normalizing the business-supplied website
//! - Discovering targets from the sitemap
//! - Fetching and extracting each target, isolating failures per URL
//! - Assembling the final report in target order

use crate::config::{Config, CrawlerConfig};
use crate::crawler::extract::extract;
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::report::{ScrapeReport, ScrapedPage};
use crate::crawler::sitemap::SitemapDiscoverer;
use crate::url::normalize_root_url;
use crate::{CorpusError, UrlError};
use futures::stream::{self, StreamExt};
use url::Url;

/// Why a target did not make it into the report
#[derive(Debug)]
enum PageSkip {
    Fetch(FetchError),
    TooShort { chars: usize },
}

/// Runs bounded crawls of a single website
///
/// The scraper holds no state between runs; every call to [`Scraper::run`]
/// starts from scratch.
#[derive(Debug, Clone)]
pub struct Scraper {
    fetcher: Fetcher,
    config: CrawlerConfig,
}

impl Scraper {
    /// Creates a scraper from an injected fetcher and crawl settings
    pub fn new(fetcher: Fetcher, config: CrawlerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Creates a scraper with a client built from the full configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to crawl
    /// * `Err(CorpusError)` - The HTTP client could not be built
    pub fn from_config(config: &Config) -> Result<Self, CorpusError> {
        let fetcher = Fetcher::from_config(&config.user_agent)?;
        Ok(Self::new(fetcher, config.crawler.clone()))
    }

    /// The crawl settings in use
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Discovers the crawl targets for a website without fetching them
    ///
    /// An invalid website yields the trimmed input as the sole target (or no
    /// target at all when the input is blank).
    pub async fn discover(&self, website: &str, max_pages: usize) -> Vec<String> {
        match normalize_root_url(website) {
            Ok(root) => self.discover_from(&root, max_pages).await,
            Err(e) => {
                tracing::warn!("{}; treating it as the only target", e);
                let raw = website.trim();
                if raw.is_empty() {
                    Vec::new()
                } else {
                    vec![raw.to_string()]
                }
            }
        }
    }

    async fn discover_from(&self, root: &Url, max_pages: usize) -> Vec<String> {
        SitemapDiscoverer::new(
            self.fetcher.clone(),
            self.config.sitemap_timeout(),
            self.config.max_child_sitemaps,
        )
        .discover(root, max_pages)
        .await
    }

    /// Crawls a website and returns the discovered targets and usable pages
    ///
    /// # Flow
    ///
    /// 1. Discover up to `max_pages` targets from the sitemap
    /// 2. Fetch and extract every target, up to `concurrency` at a time
    /// 3. Drop targets that failed or produced too little text
    ///
    /// This never fails. A crawl that produced nothing has an empty `pages`
    /// list; see [`Scraper::run_checked`] for a variant that reports it.
    pub async fn run(&self, website: &str, max_pages: usize) -> ScrapeReport {
        let targets = self.discover(website, max_pages).await;
        tracing::info!("Discovered {} URLs for {}", targets.len(), website.trim());
        for target in &targets {
            tracing::debug!("Target: {}", target);
        }

        let outcomes: Vec<Result<ScrapedPage, PageSkip>> = stream::iter(targets.iter())
            .map(|url| self.scrape_page(url))
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut pages = Vec::new();
        for (url, outcome) in targets.iter().zip(outcomes) {
            match outcome {
                Ok(page) => pages.push(page),
                Err(PageSkip::Fetch(e)) => tracing::warn!("Skipping {}: {}", url, e),
                Err(PageSkip::TooShort { chars }) => tracing::debug!(
                    "Skipping {}: only {} characters of text (minimum {})",
                    url,
                    chars,
                    self.config.min_text_chars
                ),
            }
        }

        tracing::info!("Extracted {} pages with readable text", pages.len());
        for page in &pages {
            tracing::info!(
                "Page: {} | title={:?} | chars={}",
                page.url,
                page.title,
                page.text_chars()
            );
        }

        ScrapeReport { targets, pages }
    }

    /// Like [`Scraper::run`], but surfaces input and empty-result conditions
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeReport)` - At least one page was scraped
    /// * `Err(CorpusError::Url)` - The website string is blank
    /// * `Err(CorpusError::NoPagesScraped)` - Nothing usable was found
    pub async fn run_checked(
        &self,
        website: &str,
        max_pages: usize,
    ) -> Result<ScrapeReport, CorpusError> {
        if website.trim().is_empty() {
            return Err(UrlError::InvalidUrl {
                input: website.to_string(),
                reason: "empty URL".to_string(),
            }
            .into());
        }

        let report = self.run(website, max_pages).await;
        if report.is_empty() {
            return Err(CorpusError::NoPagesScraped {
                targets: report.targets,
            });
        }

        Ok(report)
    }

    /// Fetches and extracts one target
    async fn scrape_page(&self, url: &str) -> Result<ScrapedPage, PageSkip> {
        let html = self
            .fetcher
            .fetch_text(url, self.config.page_timeout())
            .await
            .map_err(PageSkip::Fetch)?;

        let page_url = Url::parse(url).map_err(|e| {
            PageSkip::Fetch(FetchError::InvalidUrl {
                url: url.to_string(),
                message: e.to_string(),
            })
        })?;

        let extracted = extract(&html, &page_url);
        let chars = extracted.text.chars().count();
        if chars < self.config.min_text_chars {
            return Err(PageSkip::TooShort { chars });
        }

        Ok(ScrapedPage {
            url: url.to_string(),
            title: extracted.title,
            text: extracted.text,
        })
    }
}
