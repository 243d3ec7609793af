//! Durable cache subsystem.
//!
//! # Key Layout
//! ```text
//! cached_<type>     → CacheEntry JSON (one per resource type)
//! site_data_cache   → master document JSON
//! cache_timestamp   → master document write time (ms since epoch)
//! app_version       → last observed version marker
//! ```
//!
//! # Design Decisions
//! - Entries are keyed per resource; only a version change clears them all
//! - The version marker itself survives invalidation

pub mod entry;
pub mod storage;

use std::time::{SystemTime, UNIX_EPOCH};

use crate::data::ResourceType;

pub use entry::CacheEntry;
pub use storage::{LocalStorage, StorageError};

pub const APP_VERSION_KEY: &str = "app_version";
pub const MASTER_CACHE_KEY: &str = "site_data_cache";
pub const MASTER_TIMESTAMP_KEY: &str = "cache_timestamp";

/// Storage key of a resource's cache entry.
pub fn entry_key(resource: ResourceType) -> String {
    format!("cached_{}", resource)
}

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
