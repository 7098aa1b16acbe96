//! Cache-or-fetch resolution.
//!
//! One request runs lookup → (hit | fetch → simplify → store) → return. The
//! core performs no retries and imposes no timeout on the fetch; the injected
//! fetcher owns its own transport policy, and any fetch failure is fatal to
//! the request with no cache mutation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::Error;
use crate::key::CacheKey;
use crate::simplify::{SimplifiedDocument, simplify_response};
use crate::store::{CacheStore, NewRecord};

/// Timestamp format Figma reports in `lastModified`, e.g. `2026-01-14T05:57:11Z`.
const FIGMA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Remote fetch capability, injected by the caller.
///
/// `node_id` may be a comma-separated list (`"1:2,3:4"`), which selects the
/// nodes endpoint; `None` fetches the whole file.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, file_key: &str, node_id: Option<&str>, depth: Option<u32>) -> Result<Value, Error>;
}

/// Resolve a key to its simplified document.
///
/// A cache hit (record present, no force) deserializes the stored payload and
/// returns it without touching the network or the store. A miss, or a forced
/// refresh, fetches from the remote API, simplifies, upserts, and returns the
/// fresh document, which re-serializes byte-for-byte identically to what a
/// later hit for the same key would return.
pub async fn resolve(
    store: &dyn CacheStore, fetcher: &dyn DocumentFetcher, key: &CacheKey, depth: Option<u32>, force_refresh: bool,
) -> Result<SimplifiedDocument, Error> {
    let cached = store.get(key).await?;

    if let Some(record) = &cached
        && !force_refresh
    {
        tracing::info!(key = %key, "cache hit");
        return serde_json::from_str(&record.data)
            .map_err(|e| Error::Payload(format!("stored payload for {key} did not deserialize: {e}")));
    }

    if cached.is_some() {
        tracing::info!(key = %key, "cache force refresh");
    } else {
        tracing::info!(key = %key, "cache miss, fetching from remote API");
    }

    let raw = fetcher.fetch(&key.file_key, key.node_id.as_deref(), depth).await?;
    let simplified = simplify_response(&raw, depth);

    // An unparsable or absent lastModified is stored as absent, not an error.
    let last_modified = simplified
        .metadata
        .last_modified
        .as_deref()
        .and_then(parse_figma_timestamp);

    let data = serde_json::to_string(&simplified).map_err(|e| Error::Payload(e.to_string()))?;

    store
        .put(
            key,
            NewRecord { name: simplified.metadata.name.clone(), depth, last_modified, data },
        )
        .await?;

    Ok(simplified)
}

fn parse_figma_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, FIGMA_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
