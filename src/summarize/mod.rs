//! Summarization of a scraped corpus
//!
//! The summarizer is an external collaborator: it takes the page corpus and
//! returns a structured JSON object. Callers treat its failure as non-fatal.

mod http;

pub use http::HttpSummarizer;

use crate::crawler::ScrapedPage;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Separator placed between pages in the payload text
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Errors raised by a summarizer
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Missing API key (environment variable {0} is not set)")]
    MissingApiKey(String),

    #[error("Summarizer request timed out")]
    Timeout,

    #[error("Summarizer returned HTTP {0}")]
    Status(u16),

    #[error("Summarizer request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Summarizer returned empty content")]
    EmptyResponse,

    #[error("Summarizer response was not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Nothing to summarize")]
    NoPages,
}

/// Input handed to a summarizer
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRequest<'a> {
    pub business_name: &'a str,
    pub website: &'a str,
    pub pages: &'a [ScrapedPage],
}

/// A structured summary and the raw text it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub json: serde_json::Value,
    pub raw: String,
}

impl Summary {
    /// Parses raw summarizer output
    pub fn from_raw(raw: &str) -> Result<Self, SummarizeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(SummarizeError::EmptyResponse);
        }

        let json = serde_json::from_str(raw)?;
        Ok(Self {
            json,
            raw: raw.to_string(),
        })
    }

    /// Pretty-printed JSON, the form stored as a document
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.json)
    }
}

/// Something that can turn a page corpus into a structured summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, request: SummaryRequest<'_>) -> Result<Summary, SummarizeError>;
}

/// Renders the corpus as a single bounded block of text
///
/// The first `max_pages` pages are rendered as
/// `URL: ..\nTITLE: ..\nCONTENT:\n..`, joined by [`PAGE_SEPARATOR`] and cut to
/// `max_chars` characters.
pub fn build_payload_text(pages: &[ScrapedPage], max_pages: usize, max_chars: usize) -> String {
    let text = pages
        .iter()
        .take(max_pages)
        .map(|page| {
            format!(
                "URL: {}\nTITLE: {}\nCONTENT:\n{}",
                page.url,
                page.title.as_deref().unwrap_or(""),
                page.text
            )
        })
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);

    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text,
    }
}
