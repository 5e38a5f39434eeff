//! Statistics about a stored corpus
//!
//! This module provides functionality for summarizing what the storage layer
//! holds for one owner: the most recent scrape run and the stored documents.

use crate::storage::{DocumentStore, RunRecord};
use crate::output::OutputResult;

/// Corpus statistics for one owner
#[derive(Debug, Clone)]
pub struct CorpusStatistics {
    /// Owner the statistics were loaded for
    pub owner_id: String,

    /// Most recent scrape run, if any
    pub latest_run: Option<RunRecord>,

    /// Number of stored documents
    pub document_count: u64,

    /// Total characters across stored documents
    pub total_chars: usize,
}

impl CorpusStatistics {
    /// Share of the latest run's targets that produced a page, in percent
    pub fn success_rate(&self) -> Option<f64> {
        let run = self.latest_run.as_ref()?;
        if run.targets_count == 0 {
            return Some(0.0);
        }
        Some((run.pages_count as f64 / run.targets_count as f64) * 100.0)
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The storage backend to query
/// * `owner_id` - Owner whose corpus to describe
///
/// # Returns
///
/// * `Ok(CorpusStatistics)` - Successfully loaded statistics
/// * `Err(OutputError)` - Failed to query storage
pub fn load_statistics(store: &dyn DocumentStore, owner_id: &str) -> OutputResult<CorpusStatistics> {
    let latest_run = store.get_latest_run(owner_id)?;
    let documents = store.list_documents(owner_id)?;

    Ok(CorpusStatistics {
        owner_id: owner_id.to_string(),
        latest_run,
        document_count: documents.len() as u64,
        total_chars: documents.iter().map(|d| d.text.chars().count()).sum(),
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CorpusStatistics) {
    println!("=== Corpus Statistics ({}) ===\n", stats.owner_id);

    println!("Documents:");
    println!("  Stored documents: {}", stats.document_count);
    println!("  Total characters: {}", stats.total_chars);
    println!();

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run:");
            println!("  ID: {}", run.id);
            println!("  Website: {}", run.website);
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!("  Status: {}", run.status.to_db_string());
            println!("  Discovered URLs: {}", run.targets_count);
            println!("  Pages scraped: {}", run.pages_count);
            if let Some(rate) = stats.success_rate() {
                println!("  Success Rate: {:.1}%", rate);
            }
        }
        None => println!("No scrape runs recorded."),
    }
}
