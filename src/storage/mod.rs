//! Storage module for persisting scraped corpora
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Storing scraped pages and summaries as documents keyed by owner
//! - Tracking each scrape run and its outcome

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{DocumentStore, StorageError, StorageResult};

use crate::crawler::ScrapedPage;
use crate::CorpusError;
use serde::Serialize;

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(CorpusError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, CorpusError> {
    SqliteStorage::new(path)
}

/// Kind of a stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocumentKind {
    Document,
}

impl DocumentKind {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Document => "document",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "document" => Some(Self::Document),
            _ => None,
        }
    }
}

/// A document about to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub owner_id: String,
    pub kind: DocumentKind,
    pub title: String,
    pub text: String,
}

impl DocumentRecord {
    /// Builds the stored form of a scraped page
    ///
    /// The title is `"{title} ({url})"`, or just the URL when the page had
    /// no title.
    pub fn from_page(owner_id: &str, page: &ScrapedPage) -> Self {
        let title = match &page.title {
            Some(title) => format!("{} ({})", title, page.url),
            None => page.url.clone(),
        };

        Self {
            owner_id: owner_id.to_string(),
            kind: DocumentKind::Document,
            title,
            text: page.text.clone(),
        }
    }
}

/// A document as read back from storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredDocument {
    pub id: i64,
    pub owner_id: String,
    pub kind: DocumentKind,
    pub title: String,
    pub text: String,
    pub created_at: String,
}

/// Represents a scrape run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub owner_id: String,
    pub website: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub status: RunStatus,
    pub targets_count: u64,
    pub pages_count: u64,
}

/// Status of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    NoPages,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::NoPages => "no_pages",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "no_pages" => Some(Self::NoPages),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
