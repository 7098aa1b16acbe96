//! Cache key derivation shared by every storage backend.
//!
//! A key is the Figma file key plus an optional node id. An absent node id
//! means "the whole file" and is a distinct key variant: `(key, None)` and
//! `(key, Some(""))` must never collide in any backend.

use serde::{Deserialize, Serialize};

/// Sentinel filename token for a key with no node id.
const ROOT_TOKEN: &str = "ROOT";

/// Characters that are illegal in filenames on at least one supported platform.
const ILLEGAL_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Identity of a cached document or subtree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Figma file key.
    pub file_key: String,
    /// Figma node id (e.g. "1:2"), or None for the whole file.
    pub node_id: Option<String>,
}

impl CacheKey {
    /// Key for a whole file.
    pub fn file(file_key: impl Into<String>) -> Self {
        Self { file_key: file_key.into(), node_id: None }
    }

    /// Key for a specific node subtree.
    pub fn node(file_key: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self { file_key: file_key.into(), node_id: Some(node_id.into()) }
    }

    /// Filesystem-safe filename for this key.
    ///
    /// Node ids contain `:` which is illegal on some filesystems, so every
    /// illegal character is replaced with `_`. An absent node id maps to the
    /// fixed `ROOT` token; Figma node ids always carry a `:` separator, so no
    /// sanitized real id equals the sentinel.
    pub fn filename(&self) -> String {
        let token = match &self.node_id {
            Some(id) => sanitize(id),
            None => ROOT_TOKEN.to_string(),
        };
        format!("{}__{}.json", self.file_key, token)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(f, "{}/{}", self.file_key, id),
            None => write!(f, "{}", self.file_key),
        }
    }
}

fn sanitize(id: &str) -> String {
    id.chars()
        .map(|c| if ILLEGAL_FILENAME_CHARS.contains(&c) { '_' } else { c })
        .collect()
}
