//! Cache record types shared by both storage backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted cache record.
///
/// At most one record exists per cache key in a given backend instance.
/// Timestamps are RFC 3339 strings; `created_at` is set once on insert and
/// `updated_at` advances on every write.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheRecord {
    pub file_key: String,
    pub node_id: Option<String>,
    /// Figma file name at the time of the fetch.
    pub name: Option<String>,
    /// Depth limit the cached payload was simplified with.
    pub depth: Option<u32>,
    /// `lastModified` reported by Figma, if it parsed.
    pub last_modified: Option<String>,
    /// Serialized simplified document.
    pub data: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A record summary for listings: everything but the payload.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CacheSummary {
    pub file_key: String,
    pub node_id: Option<String>,
    pub name: Option<String>,
    pub depth: Option<u32>,
    pub last_modified: Option<String>,
    pub updated_at: String,
}

/// The mutable fields written on every `put`.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub name: Option<String>,
    pub depth: Option<u32>,
    pub last_modified: Option<DateTime<Utc>>,
    pub data: String,
}

impl CacheRecord {
    /// Summary view of this record.
    pub fn summary(&self) -> CacheSummary {
        CacheSummary {
            file_key: self.file_key.clone(),
            node_id: self.node_id.clone(),
            name: self.name.clone(),
            depth: self.depth,
            last_modified: self.last_modified.clone(),
            updated_at: self.updated_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_drops_payload() {
        let record = CacheRecord {
            file_key: "abc".into(),
            node_id: Some("1:2".into()),
            name: Some("Design".into()),
            depth: Some(3),
            last_modified: None,
            data: "{}".into(),
            created_at: "2026-01-01T00:00:00+00:00".into(),
            updated_at: "2026-01-02T00:00:00+00:00".into(),
        };

        let summary = record.summary();
        assert_eq!(summary.file_key, "abc");
        assert_eq!(summary.node_id.as_deref(), Some("1:2"));
        assert_eq!(summary.updated_at, record.updated_at);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("data").is_none());
    }
}
