//! Schema migrations for the SQLite backend.
//!
//! Applied versions are recorded in a `_migrations` table; on open, every
//! migration above the recorded maximum runs as one SQL batch.

use tokio_rusqlite::{Connection, params};

use crate::error::Error;

/// Ordered (version, SQL batch) pairs. Versions are dense and ascending;
/// each batch uses CREATE IF NOT EXISTS so a replay is harmless.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_documents.sql"))];

/// Bring the schema up to the latest version.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(Error::from)?;

        let current: i64 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| {
                row.get(0)
            })
            .map_err(Error::from)?;

        for &(version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > current) {
            conn.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("migration {version}: {e}")))?;
            conn.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )
            .map_err(Error::from)?;
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_exists(conn: &Connection, name: &str) -> bool {
        let name = name.to_string();
        conn.call(move |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1)",
                params![name],
                |row| row.get(0),
            )
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();
        run(&conn).await.unwrap();

        assert!(table_exists(&conn, "figma_documents").await);
    }

    #[tokio::test]
    async fn test_applied_versions_recorded() {
        let conn = Connection::open_in_memory().await.unwrap();
        run(&conn).await.unwrap();

        let max: i64 = conn
            .call(|conn| {
                conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| {
                    row.get(0)
                })
            })
            .await
            .unwrap();

        assert_eq!(max, MIGRATIONS.last().unwrap().0);

        // A second run must not re-record anything.
        run(&conn).await.unwrap();
        let count: i64 = conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM _migrations", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as i64);
    }
}
