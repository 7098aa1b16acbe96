//! SQLite storage backend.
//!
//! Stores records in an indexed table with async access via tokio-rusqlite,
//! WAL mode for concurrent access, and automatic schema migrations. The
//! write path is a read-then-write inside a single transaction so concurrent
//! writers for one key overwrite instead of duplicating.

use std::path::Path;

use async_trait::async_trait;
use tokio_rusqlite::rusqlite::OptionalExtension;
use tokio_rusqlite::{Connection, params};

use super::migrations;
use super::record::{CacheRecord, CacheSummary, NewRecord};
use super::CacheStore;
use crate::error::Error;
use crate::key::CacheKey;

/// SQLite-backed cache store.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path.as_ref().to_path_buf())
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for SqliteStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheRecord>, Error> {
        let key = key.clone();
        self.conn
            .call(move |conn| -> Result<Option<CacheRecord>, Error> {
                // `IS` matches NULL against NULL only, so a whole-file key
                // never aliases an empty-string node id.
                let record = conn
                    .query_row(
                        "SELECT file_key, node_id, name, depth, last_modified, data, created_at, updated_at
                         FROM figma_documents
                         WHERE file_key = ?1 AND node_id IS ?2",
                        params![key.file_key, key.node_id],
                        |row| {
                            Ok(CacheRecord {
                                file_key: row.get(0)?,
                                node_id: row.get(1)?,
                                name: row.get(2)?,
                                depth: row.get::<_, Option<i64>>(3)?.map(|d| d as u32),
                                last_modified: row.get(4)?,
                                data: row.get(5)?,
                                created_at: row.get(6)?,
                                updated_at: row.get(7)?,
                            })
                        },
                    )
                    .optional()?;
                Ok(record)
            })
            .await
            .map_err(Error::from)
    }

    async fn put(&self, key: &CacheKey, record: NewRecord) -> Result<(), Error> {
        let key = key.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let now = chrono::Utc::now().to_rfc3339();
                let depth = record.depth.map(i64::from);
                let last_modified = record.last_modified.map(|dt| dt.to_rfc3339());

                let tx = conn.transaction()?;

                let existing: Option<i64> = tx
                    .query_row(
                        "SELECT id FROM figma_documents WHERE file_key = ?1 AND node_id IS ?2",
                        params![key.file_key, key.node_id],
                        |row| row.get(0),
                    )
                    .optional()?;

                match existing {
                    Some(id) => {
                        tx.execute(
                            "UPDATE figma_documents
                             SET name = ?1, depth = ?2, last_modified = ?3, data = ?4, updated_at = ?5
                             WHERE id = ?6",
                            params![record.name, depth, last_modified, record.data, now, id],
                        )?;
                    }
                    None => {
                        tx.execute(
                            "INSERT INTO figma_documents
                             (file_key, node_id, name, depth, last_modified, data, created_at, updated_at)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                            params![
                                key.file_key,
                                key.node_id,
                                record.name,
                                depth,
                                last_modified,
                                record.data,
                                now,
                                now
                            ],
                        )?;
                    }
                }

                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool, Error> {
        let key = key.clone();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute(
                    "DELETE FROM figma_documents WHERE file_key = ?1 AND node_id IS ?2",
                    params![key.file_key, key.node_id],
                )?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<(u64, Vec<CacheSummary>), Error> {
        self.conn
            .call(move |conn| -> Result<(u64, Vec<CacheSummary>), Error> {
                let total: i64 = conn.query_row("SELECT COUNT(*) FROM figma_documents", [], |row| row.get(0))?;

                let mut stmt = conn.prepare(
                    "SELECT file_key, node_id, name, depth, last_modified, updated_at
                     FROM figma_documents
                     ORDER BY updated_at DESC
                     LIMIT ?1 OFFSET ?2",
                )?;

                let items = stmt
                    .query_map(params![limit as i64, offset as i64], |row| {
                        Ok(CacheSummary {
                            file_key: row.get(0)?,
                            node_id: row.get(1)?,
                            name: row.get(2)?,
                            depth: row.get::<_, Option<i64>>(3)?.map(|d| d as u32),
                            last_modified: row.get(4)?,
                            updated_at: row.get(5)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok((total as u64, items))
            })
            .await
            .map_err(Error::from)
    }
}
