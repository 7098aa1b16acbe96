//! Interchangeable cache storage backends.
//!
//! A [`CacheStore`] persists simplified Figma documents keyed by
//! [`CacheKey`](crate::CacheKey). Two implementations satisfy the same
//! contract and share one logical key space, so switching backends is a
//! drop-in replacement:
//!
//! - [`SqliteStore`]: indexed table with WAL mode and schema migrations
//! - [`FsStore`]: one self-contained JSON file per key
//!
//! Records never expire on their own; deletion is an explicit operation.

pub mod fs;
pub mod migrations;
pub mod record;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::Error;
use crate::key::CacheKey;

pub use fs::FsStore;
pub use record::{CacheRecord, CacheSummary, NewRecord};
pub use sqlite::SqliteStore;

/// Storage backend contract.
///
/// Both implementations must behave identically: a missing record is
/// `Ok(None)` rather than an error, `put` is an idempotent upsert that
/// preserves `created_at` across overwrites, and key lookups distinguish an
/// absent node id from an empty-string one.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up the record for a key.
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheRecord>, Error>;

    /// Insert or overwrite the record for a key.
    async fn put(&self, key: &CacheKey, record: NewRecord) -> Result<(), Error>;

    /// Remove the record for a key. Returns true iff a record existed.
    async fn delete(&self, key: &CacheKey) -> Result<bool, Error>;

    /// Page through record summaries (no payloads), newest update first.
    ///
    /// Returns the total record count alongside the requested page.
    async fn list(&self, offset: u64, limit: u64) -> Result<(u64, Vec<CacheSummary>), Error>;
}

/// Which storage backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Sqlite,
    File,
}

/// Open the storage backend selected by configuration.
pub async fn open_store(config: &AppConfig) -> Result<Arc<dyn CacheStore>, Error> {
    match config.backend {
        StoreKind::Sqlite => Ok(Arc::new(SqliteStore::open(&config.db_path).await?)),
        StoreKind::File => Ok(Arc::new(FsStore::open(&config.data_dir).await?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_store_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            backend: StoreKind::File,
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let store = open_store(&config).await.unwrap();
        let (total, items) = store.list(0, 10).await.unwrap();
        assert_eq!(total, 0);
        assert!(items.is_empty());
    }

    #[test]
    fn test_store_kind_from_str() {
        let kind: StoreKind = serde_json::from_str("\"sqlite\"").unwrap();
        assert_eq!(kind, StoreKind::Sqlite);
        let kind: StoreKind = serde_json::from_str("\"file\"").unwrap();
        assert_eq!(kind, StoreKind::File);
    }
}
