//! Output module for presenting crawl results and stored corpora
//!
//! This module handles:
//! - Printing scrape reports and ingest outcomes (plain text or JSON)
//! - Statistics about the corpus stored for an owner
//! - Exporting a stored corpus as markdown

mod console;
mod markdown;
pub mod stats;

pub use console::{format_outcome, format_report, print_outcome, print_report, to_json};
pub use markdown::{format_markdown_corpus, generate_markdown_corpus};
pub use stats::{load_statistics, print_statistics, CorpusStatistics};

use thiserror::Error;

/// Errors that can occur while producing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] crate::storage::StorageError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
