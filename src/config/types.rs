use crate::crawler::{DEFAULT_MAX_PAGES, MIN_TEXT_CHARS, PAGE_TIMEOUT, SITEMAP_TIMEOUT};
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Site-Corpus
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub summarizer: Option<SummarizerConfig>,
}

/// Crawl budget and timeout configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages discovered and scraped per crawl
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Timeout for each sitemap request (seconds)
    #[serde(rename = "sitemap-timeout-secs")]
    pub sitemap_timeout_secs: u64,

    /// Timeout for each content page request (seconds)
    #[serde(rename = "page-timeout-secs")]
    pub page_timeout_secs: u64,

    /// Maximum number of child sitemaps visited from a sitemap index
    #[serde(rename = "max-child-sitemaps")]
    pub max_child_sitemaps: usize,

    /// Minimum extracted text length (characters) for a page to be kept
    #[serde(rename = "min-text-chars")]
    pub min_text_chars: usize,

    /// Number of pages fetched at the same time
    pub concurrency: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            sitemap_timeout_secs: SITEMAP_TIMEOUT.as_secs(),
            page_timeout_secs: PAGE_TIMEOUT.as_secs(),
            max_child_sitemaps: 5,
            min_text_chars: MIN_TEXT_CHARS,
            concurrency: 1,
        }
    }
}

impl CrawlerConfig {
    pub fn sitemap_timeout(&self) -> Duration {
        Duration::from_secs(self.sitemap_timeout_secs)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent header value
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file holding stored documents
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// Summarization endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    /// URL the page corpus is POSTed to
    pub endpoint: String,

    /// Name of the environment variable holding the bearer key
    #[serde(rename = "api-key-env", default = "default_api_key_env")]
    pub api_key_env: String,

    /// Request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_summarizer_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of pages included in the payload
    #[serde(rename = "max-pages", default = "default_summarizer_pages")]
    pub max_pages: usize,

    /// Maximum payload length (characters)
    #[serde(rename = "max-payload-chars", default = "default_payload_chars")]
    pub max_payload_chars: usize,
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_key_env() -> String {
    "SUMMARIZER_API_KEY".to_string()
}

fn default_summarizer_timeout() -> u64 {
    60
}

fn default_summarizer_pages() -> usize {
    12
}

fn default_payload_chars() -> usize {
    120_000
}
