//! Site-Corpus: a bounded website crawl-and-extract pipeline
//!
//! Given a business's root URL, this crate discovers a bounded set of
//! same-origin pages from the site's sitemap, fetches each one, extracts the
//! main readable text, and hands back a normalized `(url, title, text)` corpus
//! ready for storage or summarization.

pub mod config;
pub mod crawler;
pub mod ingest;
pub mod output;
pub mod storage;
pub mod summarize;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Corpus operations
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("No pages could be scraped from the website ({} URLs discovered)", targets.len())]
    NoPagesScraped { targets: Vec<String> },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },
}

/// Result type alias for Site-Corpus operations
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{ScrapeReport, ScrapedPage, Scraper};
pub use url::{normalize_root_url, same_origin};
