//! Flat-file storage backend.
//!
//! One self-contained JSON file per cache key, named by
//! [`CacheKey::filename`]. Reads fail soft: a malformed or unreadable file is
//! logged and reported as a miss so a corrupt entry never blocks a refetch.
//! Writes are plain overwrites with last-writer-wins semantics; callers that
//! need stronger guarantees must serialize externally or use the SQLite
//! backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::record::{CacheRecord, CacheSummary, NewRecord};
use super::CacheStore;
use crate::error::Error;
use crate::key::CacheKey;

/// On-disk record format.
///
/// `last_modified` and `updated_at` are ISO 8601 strings. There is no
/// separate creation timestamp in this format; `updated_at` doubles as both
/// when a record is read back.
#[derive(Debug, Serialize, Deserialize)]
struct FileRecord {
    file_key: String,
    node_id: Option<String>,
    name: Option<String>,
    depth: Option<u32>,
    last_modified: Option<String>,
    data: String,
    updated_at: String,
}

/// Flat-file cache store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::Store(format!("failed to create data dir {}: {e}", dir.display())))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.filename())
    }

    /// Read and parse one record file, failing soft.
    async fn read_record(&self, path: &Path) -> Option<FileRecord> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read cache file, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed cache file, treating as miss");
                None
            }
        }
    }
}

impl From<FileRecord> for CacheRecord {
    fn from(file: FileRecord) -> Self {
        CacheRecord {
            file_key: file.file_key,
            node_id: file.node_id,
            name: file.name,
            depth: file.depth,
            last_modified: file.last_modified,
            data: file.data,
            created_at: file.updated_at.clone(),
            updated_at: file.updated_at,
        }
    }
}

#[async_trait]
impl CacheStore for FsStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<CacheRecord>, Error> {
        let path = self.path_for(key);
        Ok(self.read_record(&path).await.map(CacheRecord::from))
    }

    async fn put(&self, key: &CacheKey, record: NewRecord) -> Result<(), Error> {
        let path = self.path_for(key);

        let file = FileRecord {
            file_key: key.file_key.clone(),
            node_id: key.node_id.clone(),
            name: record.name,
            depth: record.depth,
            last_modified: record.last_modified.map(|dt| dt.to_rfc3339()),
            data: record.data,
            updated_at: chrono::Utc::now().to_rfc3339(),
        };

        let contents = serde_json::to_vec_pretty(&file)
            .map_err(|e| Error::Store(format!("failed to serialize record for {key}: {e}")))?;

        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| Error::Store(format!("failed to write {}: {e}", path.display())))
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool, Error> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::Store(format!("failed to delete {}: {e}", path.display()))),
        }
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<(u64, Vec<CacheSummary>), Error> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| Error::Store(format!("failed to read data dir {}: {e}", self.dir.display())))?;

        let mut summaries = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::Store(format!("failed to read data dir {}: {e}", self.dir.display())))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            // Corrupt files are skipped, same as a miss on get.
            if let Some(record) = self.read_record(&path).await {
                summaries.push(CacheRecord::from(record).summary());
            }
        }

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        let total = summaries.len() as u64;
        let page = summaries
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok((total, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(data: &str) -> NewRecord {
        NewRecord {
            name: Some("Design".to_string()),
            depth: None,
            last_modified: Some(chrono::Utc::now()),
            data: data.to_string(),
        }
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        let key = CacheKey::node("abc123", "1:2");

        store.put(&key, make_record("{\"nodes\":[]}")).await.unwrap();

        let record = store.get(&key).await.unwrap().unwrap();
        assert_eq!(record.file_key, "abc123");
        assert_eq!(record.node_id.as_deref(), Some("1:2"));
        assert_eq!(record.data, "{\"nodes\":[]}");
        assert!(record.last_modified.is_some());

        assert!(dir.path().join("abc123__1_2.json").exists());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        assert!(store.get(&CacheKey::file("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        let key = CacheKey::file("abc123");

        std::fs::write(dir.path().join(key.filename()), "{not valid json").unwrap();

        let result = store.get(&key).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        let key = CacheKey::file("abc123");

        store.put(&key, make_record("first")).await.unwrap();
        store.put(&key, make_record("second")).await.unwrap();

        let record = store.get(&key).await.unwrap().unwrap();
        assert_eq!(record.data, "second");

        let (total, _) = store.list(0, 10).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_absent_node_id_distinct_from_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        let whole = CacheKey::file("abc123");
        let empty = CacheKey::node("abc123", "");

        store.put(&whole, make_record("whole")).await.unwrap();
        assert!(store.get(&empty).await.unwrap().is_none());

        store.put(&empty, make_record("empty")).await.unwrap();
        assert_eq!(store.get(&whole).await.unwrap().unwrap().data, "whole");
        assert_eq!(store.get(&empty).await.unwrap().unwrap().data, "empty");
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();
        let key = CacheKey::node("abc123", "1:2");

        assert!(!store.delete(&key).await.unwrap());

        store.put(&key, make_record("{}")).await.unwrap();
        assert!(store.delete(&key).await.unwrap());
        assert!(store.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::open(dir.path()).await.unwrap();

        store.put(&CacheKey::file("good"), make_record("{}")).await.unwrap();
        std::fs::write(dir.path().join("bad__ROOT.json"), "garbage").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a record").unwrap();

        let (total, items) = store.list(0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].file_key, "good");
    }
}
