//! cache_delete tool implementation.
//!
//! Explicit invalidation: records never expire on their own.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use figcache_core::{CacheKey, CacheStore, Error};

/// Parameters for the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteParams {
    /// The Figma file key of the entry to delete.
    pub file_key: String,

    /// Node id of the entry, if it caches a subtree rather than the whole file.
    #[serde(default)]
    pub node_id: Option<String>,
}

/// Output from the cache_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheDeleteOutput {
    pub deleted: bool,
}

/// Implementation of the cache_delete tool.
pub async fn delete_impl(store: &dyn CacheStore, params: CacheDeleteParams) -> Result<CallToolResult, McpError> {
    if params.file_key.is_empty() {
        return Err(Error::InvalidInput("file_key cannot be empty".into()).into());
    }

    let key = CacheKey { file_key: params.file_key, node_id: params.node_id.filter(|id| !id.is_empty()) };

    if !store.delete(&key).await? {
        return Err(Error::CacheMiss(key.to_string()).into());
    }

    let output = CacheDeleteOutput { deleted: true };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::Payload(format!("failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figcache_core::store::{NewRecord, SqliteStore};

    #[tokio::test]
    async fn test_delete_missing_entry_is_error() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let params = CacheDeleteParams { file_key: "abc123".into(), node_id: None };

        let result = delete_impl(&store, params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_existing_entry() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let key = CacheKey::node("abc123", "1:2");
        store
            .put(&key, NewRecord { name: None, depth: None, last_modified: None, data: "{}".into() })
            .await
            .unwrap();

        let params = CacheDeleteParams { file_key: "abc123".into(), node_id: Some("1:2".into()) };
        delete_impl(&store, params).await.unwrap();

        assert!(store.get(&key).await.unwrap().is_none());
    }
}
