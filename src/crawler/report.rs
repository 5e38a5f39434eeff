//! Crawl result types
//!
//! These are produced fresh for every crawl and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Minimum extracted text length for a page to be kept
///
/// Counted in Unicode scalar values (`chars()`), not UTF-16 code units, so
/// text outside the Basic Multilingual Plane (emoji, for instance) counts one
/// per character rather than two.
pub const MIN_TEXT_CHARS: usize = 200;

/// Default crawl budget
pub const DEFAULT_MAX_PAGES: usize = 20;

/// A page whose readable text passed the length threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedPage {
    /// The target URL the page was fetched from
    pub url: String,

    /// Page title, when one could be found
    pub title: Option<String>,

    /// Normalized readable text
    pub text: String,
}

impl ScrapedPage {
    /// Length of the text in characters
    pub fn text_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// Outcome of one crawl
///
/// `pages` holds only the targets that could be fetched and yielded enough
/// text, in the same order as `targets`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// Every URL the crawl attempted, homepage first
    pub targets: Vec<String>,

    /// Pages with usable text
    pub pages: Vec<ScrapedPage>,
}

impl ScrapeReport {
    /// True when no page produced usable text
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total characters of text across all pages
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(ScrapedPage::text_chars).sum()
    }
}
