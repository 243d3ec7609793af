//! Per-resource cache entries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::now_millis;
use crate::data::{ResourceType, Row};

/// A timestamped snapshot of one resource's rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub resource: ResourceType,
    pub rows: Vec<Row>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Version marker observed when the entry was written.
    pub app_version: Option<String>,
}

impl CacheEntry {
    pub fn new(resource: ResourceType, rows: Vec<Row>, app_version: Option<String>) -> Self {
        Self {
            resource,
            rows,
            timestamp: now_millis(),
            app_version,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// `ttl` of `None` never expires.
    pub fn is_expired(&self, ttl: Option<Duration>, now_ms: u64) -> bool {
        match ttl {
            Some(ttl) => now_ms.saturating_sub(self.timestamp) >= ttl.as_millis() as u64,
            None => false,
        }
    }

    /// Non-empty, written under the current version, and within TTL.
    pub fn is_usable(&self, current_version: Option<&str>, ttl: Option<Duration>, now_ms: u64) -> bool {
        !self.rows.is_empty()
            && self.app_version.as_deref() == current_version
            && !self.is_expired(ttl, now_ms)
    }
}
