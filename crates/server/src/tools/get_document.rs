//! get_figma_data tool implementation.
//!
//! Resolves a file (or node subtree) through the cache: a hit is served
//! locally, a miss or forced refresh goes to the Figma API, gets simplified,
//! and is cached before being returned.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use figcache_core::{CacheKey, CacheStore, DocumentFetcher, Error, resolve};

/// Parameters for the get_figma_data tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetFigmaDataParams {
    /// The Figma file key (from the file URL).
    pub file_key: String,

    /// Node id(s) to fetch, comma-separated (e.g. "1:2,3:4").
    /// Omit to fetch the whole file.
    #[serde(default)]
    pub node_id: Option<String>,

    /// Maximum tree depth to include, counted from the top-level children.
    #[serde(default)]
    pub depth: Option<u32>,

    /// Bypass an existing cache entry and re-fetch from the Figma API.
    #[serde(default)]
    pub force_refresh: bool,
}

/// Implementation of the get_figma_data tool.
pub async fn get_document_impl(
    store: &dyn CacheStore, fetcher: &dyn DocumentFetcher, params: GetFigmaDataParams,
) -> Result<CallToolResult, McpError> {
    if params.file_key.is_empty() {
        return Err(Error::InvalidInput("file_key cannot be empty".into()).into());
    }

    // An empty node_id means "whole file", same as omitting it.
    let key = CacheKey {
        file_key: params.file_key,
        node_id: params.node_id.filter(|id| !id.is_empty()),
    };

    let document = resolve(store, fetcher, &key, params.depth, params.force_refresh).await?;

    let json = serde_json::to_string_pretty(&document)
        .map_err(|e| Error::Payload(format!("failed to serialize document: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::{Value, json};

    use super::*;
    use figcache_core::store::SqliteStore;

    struct MockFetcher {
        calls: AtomicUsize,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl DocumentFetcher for MockFetcher {
        async fn fetch(&self, _file_key: &str, _node_id: Option<&str>, _depth: Option<u32>) -> Result<Value, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(json!({
                "name": "Design",
                "lastModified": "2026-01-14T05:57:11Z",
                "document": {"children": [{"id": "1:1", "name": "Page", "type": "CANVAS"}]}
            }))
        }
    }

    fn params(file_key: &str) -> GetFigmaDataParams {
        GetFigmaDataParams { file_key: file_key.into(), node_id: None, depth: None, force_refresh: false }
    }

    fn content_text(result: &CallToolResult) -> String {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        content_val.get("text").and_then(|v| v.as_str()).unwrap().to_string()
    }

    #[tokio::test]
    async fn test_empty_file_key_rejected() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let result = get_document_impl(&store, &MockFetcher::new(), params("")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let fetcher = MockFetcher::new();

        let first = get_document_impl(&store, &fetcher, params("abc123")).await.unwrap();
        let second = get_document_impl(&store, &fetcher, params("abc123")).await.unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(content_text(&first), content_text(&second));
    }

    #[tokio::test]
    async fn test_empty_node_id_means_whole_file() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let fetcher = MockFetcher::new();

        let mut p = params("abc123");
        p.node_id = Some(String::new());
        get_document_impl(&store, &fetcher, p).await.unwrap();

        assert!(store.get(&CacheKey::file("abc123")).await.unwrap().is_some());
    }
}
