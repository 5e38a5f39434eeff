//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{DocumentRecord, RunRecord, RunStatus, StoredDocument};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Documents belong to an owner (the entity the website was scraped for).
/// Runs record every scrape attempt, including those that found nothing.
pub trait DocumentStore {
    // ===== Run Management =====

    /// Records the start of a scrape run and returns its ID
    fn create_run(&mut self, owner_id: &str, website: &str) -> StorageResult<i64>;

    /// Marks a run as finished
    ///
    /// # Arguments
    ///
    /// * `run_id` - The run to finish
    /// * `status` - Final status
    /// * `targets_count` - Number of URLs the crawl attempted
    /// * `pages_count` - Number of pages with usable text
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        targets_count: u64,
        pages_count: u64,
    ) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run for an owner
    fn get_latest_run(&self, owner_id: &str) -> StorageResult<Option<RunRecord>>;

    // ===== Documents =====

    /// Inserts documents atomically and returns their IDs in input order
    ///
    /// Either every document is stored or none is.
    fn insert_documents(&mut self, documents: &[DocumentRecord]) -> StorageResult<Vec<i64>>;

    /// Lists an owner's documents, oldest first
    fn list_documents(&self, owner_id: &str) -> StorageResult<Vec<StoredDocument>>;

    /// Counts an owner's documents
    fn count_documents(&self, owner_id: &str) -> StorageResult<u64>;
}
