//! cache_list tool implementation.
//!
//! Pages through cached record summaries, newest update first.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use figcache_core::{CacheStore, CacheSummary, Error};

/// Parameters for the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListParams {
    /// Number of entries to skip.
    #[serde(default)]
    pub offset: u64,

    /// Maximum number of entries to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    10
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    /// Total number of cached entries.
    pub total: u64,
    /// The requested page of entries.
    pub items: Vec<CacheSummary>,
}

/// Implementation of the cache_list tool.
pub async fn list_impl(store: &dyn CacheStore, params: CacheListParams) -> Result<CallToolResult, McpError> {
    let (total, items) = store.list(params.offset, params.limit).await?;

    let output = CacheListOutput { total, items };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::Payload(format!("failed to serialize listing: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
