//! cache_sync tool implementation.
//!
//! Force-refreshes an existing cache entry from the Figma API, reusing the
//! depth the entry was originally cached with. Sync targets an existing
//! record; refreshing an unknown key is what get_figma_data with
//! force_refresh is for.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use figcache_core::{CacheKey, CacheStore, DocumentFetcher, Error, resolve};

/// Parameters for the cache_sync tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheSyncParams {
    /// The Figma file key of the entry to refresh.
    pub file_key: String,

    /// Node id of the entry, if it caches a subtree rather than the whole file.
    #[serde(default)]
    pub node_id: Option<String>,
}

/// Output from the cache_sync tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheSyncOutput {
    pub synced: bool,
    /// File name reported by the refreshed document, if any.
    pub name: Option<String>,
}

/// Implementation of the cache_sync tool.
pub async fn sync_impl(
    store: &dyn CacheStore, fetcher: &dyn DocumentFetcher, params: CacheSyncParams,
) -> Result<CallToolResult, McpError> {
    if params.file_key.is_empty() {
        return Err(Error::InvalidInput("file_key cannot be empty".into()).into());
    }

    let key = CacheKey { file_key: params.file_key, node_id: params.node_id.filter(|id| !id.is_empty()) };

    let record = store
        .get(&key)
        .await?
        .ok_or_else(|| Error::CacheMiss(key.to_string()))?;

    let document = resolve(store, fetcher, &key, record.depth, true).await?;

    let output = CacheSyncOutput { synced: true, name: document.metadata.name };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::Payload(format!("failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use figcache_core::store::{NewRecord, SqliteStore};

    struct MockFetcher {
        calls: AtomicUsize,
        last_depth: std::sync::Mutex<Option<u32>>,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), last_depth: std::sync::Mutex::new(None) }
        }
    }

    #[async_trait]
    impl DocumentFetcher for MockFetcher {
        async fn fetch(&self, _file_key: &str, _node_id: Option<&str>, depth: Option<u32>) -> Result<Value, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_depth.lock().unwrap() = depth;
            Ok(json!({"name": "Fresh", "document": {"children": []}}))
        }
    }

    #[tokio::test]
    async fn test_sync_unknown_entry_is_error() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let params = CacheSyncParams { file_key: "abc123".into(), node_id: None };

        let result = sync_impl(&store, &MockFetcher::new(), params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_sync_refreshes_with_stored_depth() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let key = CacheKey::file("abc123");
        store
            .put(&key, NewRecord { name: Some("Stale".into()), depth: Some(3), last_modified: None, data: "{}".into() })
            .await
            .unwrap();

        let fetcher = MockFetcher::new();
        let params = CacheSyncParams { file_key: "abc123".into(), node_id: None };
        sync_impl(&store, &fetcher, params).await.unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*fetcher.last_depth.lock().unwrap(), Some(3));

        let record = store.get(&key).await.unwrap().unwrap();
        assert_eq!(record.name.as_deref(), Some("Fresh"));
    }
}
