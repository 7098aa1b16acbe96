//! Cache administration tools.
//!
//! A thin façade over the storage contract: listing, deletion, and manual
//! sync all go through the public `CacheStore`/`resolve` interfaces.

pub mod delete;
pub mod get;
pub mod list;
pub mod sync;

pub use delete::{CacheDeleteParams, delete_impl};
pub use get::{CacheGetParams, get_impl};
pub use list::{CacheListParams, list_impl};
pub use sync::{CacheSyncParams, sync_impl};
