//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the DocumentStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DocumentStore, StorageError, StorageResult};
use crate::storage::{DocumentKind, DocumentRecord, RunRecord, RunStatus, StoredDocument};
use crate::CorpusError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str =
    "id, owner_id, website, started_at, finished_at, status, targets_count, pages_count";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(CorpusError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, CorpusError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, CorpusError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<(RunRecord, String)> {
    let status: String = row.get(5)?;
    let run = RunRecord {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        website: row.get(2)?,
        started_at: row.get(3)?,
        finished_at: row.get(4)?,
        status: RunStatus::from_db_string(&status).unwrap_or(RunStatus::Failed),
        targets_count: row.get::<_, i64>(6)? as u64,
        pages_count: row.get::<_, i64>(7)? as u64,
    };
    Ok((run, status))
}

fn check_run(row: (RunRecord, String)) -> StorageResult<RunRecord> {
    let (run, status) = row;
    if RunStatus::from_db_string(&status).is_none() {
        return Err(StorageError::CorruptRow(format!(
            "run {} has unknown status '{}'",
            run.id, status
        )));
    }
    Ok(run)
}

impl DocumentStore for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, owner_id: &str, website: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (owner_id, website, started_at, status) VALUES (?1, ?2, ?3, ?4)",
            params![owner_id, website, now, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        targets_count: u64,
        pages_count: u64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, targets_count = ?3, pages_count = ?4
             WHERE id = ?5",
            params![
                status.to_db_string(),
                now,
                targets_count as i64,
                pages_count as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))?;

        check_run(row)
    }

    fn get_latest_run(&self, owner_id: &str) -> StorageResult<Option<RunRecord>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM runs WHERE owner_id = ?1 ORDER BY id DESC LIMIT 1",
                    RUN_COLUMNS
                ),
                params![owner_id],
                run_from_row,
            )
            .optional()?;

        row.map(check_run).transpose()
    }

    // ===== Documents =====

    fn insert_documents(&mut self, documents: &[DocumentRecord]) -> StorageResult<Vec<i64>> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(documents.len());

        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (owner_id, kind, title, text_content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;

            for document in documents {
                stmt.execute(params![
                    document.owner_id,
                    document.kind.to_db_string(),
                    document.title,
                    document.text,
                    now
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }

        tx.commit()?;
        Ok(ids)
    }

    fn list_documents(&self, owner_id: &str) -> StorageResult<Vec<StoredDocument>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, kind, title, text_content, created_at
             FROM documents WHERE owner_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![owner_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, owner_id, kind, title, text, created_at) = row?;
            let kind = DocumentKind::from_db_string(&kind).ok_or_else(|| {
                StorageError::CorruptRow(format!("document {} has unknown kind '{}'", id, kind))
            })?;

            documents.push(StoredDocument {
                id,
                owner_id,
                kind,
                title,
                text,
                created_at,
            });
        }

        Ok(documents)
    }

    fn count_documents(&self, owner_id: &str) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE owner_id = ?1",
            params![owner_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
