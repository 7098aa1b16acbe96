//! cache_get tool implementation.
//!
//! Reads one cache entry in full, payload included. The cache-or-fetch path
//! is get_figma_data; this tool never touches the Figma API.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use figcache_core::{CacheKey, CacheRecord, CacheStore, Error};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The Figma file key of the entry to read.
    pub file_key: String,

    /// Node id of the entry, if it caches a subtree rather than the whole file.
    #[serde(default)]
    pub node_id: Option<String>,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    /// The cached record, including its serialized document payload.
    pub record: CacheRecord,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(store: &dyn CacheStore, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    if params.file_key.is_empty() {
        return Err(Error::InvalidInput("file_key cannot be empty".into()).into());
    }

    let key = CacheKey { file_key: params.file_key, node_id: params.node_id.filter(|id| !id.is_empty()) };

    let record = store
        .get(&key)
        .await?
        .ok_or_else(|| Error::CacheMiss(key.to_string()))?;

    let output = CacheGetOutput { record };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::Payload(format!("failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
