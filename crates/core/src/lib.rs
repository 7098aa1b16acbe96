//! Core types and shared functionality for mcp-figma.
//!
//! This crate provides:
//! - The cache key codec shared by every storage backend
//! - Interchangeable storage backends (SQLite and flat-file)
//! - The Figma document simplification algorithm
//! - The cache-or-fetch resolve orchestration
//! - Unified error types and configuration structures

pub mod config;
pub mod error;
pub mod key;
pub mod resolve;
pub mod simplify;
pub mod store;

pub use config::AppConfig;
pub use error::Error;
pub use key::CacheKey;
pub use resolve::{DocumentFetcher, resolve};
pub use simplify::{SimplifiedDocument, SimplifiedNode};
pub use store::{CacheRecord, CacheStore, CacheSummary, NewRecord, StoreKind, open_store};
