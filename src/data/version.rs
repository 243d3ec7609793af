//! Version-triggered cache invalidation.
//!
//! # State Transitions
//! ```text
//! no marker stored      → store observed version, keep cache
//! marker == observed    → keep cache
//! marker != observed    → purge every entry but the marker, reset session,
//!                         store observed version
//! ```
//!
//! # Design Decisions
//! - Best effort: a failed probe leaves stale cache in place rather than blocking
//! - The probe has its own short budget

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{LocalStorage, APP_VERSION_KEY};
use crate::data::{csv, Row, SiteContext};
use crate::net::{SourceFetcher, SourceSpec};
use crate::observability::metrics;

/// Version string of a version dataset: first row's `value`, else its `version`.
pub fn extract_version(rows: &[Row]) -> Option<String> {
    let first = rows.first()?;
    first
        .get("value")
        .filter(|v| !v.is_empty())
        .or_else(|| first.get("version"))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Compares the live version marker with the last one seen.
#[derive(Debug, Clone)]
pub struct VersionGate {
    storage: LocalStorage,
    context: Arc<SiteContext>,
    fetcher: SourceFetcher,
    source: Option<SourceSpec>,
    limit: Duration,
}

impl VersionGate {
    pub fn new(
        storage: LocalStorage,
        context: Arc<SiteContext>,
        fetcher: SourceFetcher,
        source: Option<SourceSpec>,
        limit: Duration,
    ) -> Self {
        Self {
            storage,
            context,
            fetcher,
            source,
            limit,
        }
    }

    /// Probe the version source and invalidate caches on change. Never fails.
    pub async fn check_version(&self) {
        let Some(spec) = &self.source else {
            tracing::debug!("No version source configured, skipping version check");
            return;
        };

        let text = match spec.locate() {
            Ok(location) => self.fetcher.fetch_text(&location, self.limit).await,
            Err(e) => Err(e),
        };

        match text {
            Ok(text) => match extract_version(&csv::parse(&text)) {
                Some(version) => {
                    self.observe(&version);
                }
                None => tracing::debug!("Version source carried no version value"),
            },
            Err(e) => tracing::debug!(error = %e, "Version check skipped"),
        }
    }

    /// Record `version` as the latest seen. Returns true when it replaced a
    /// different marker, in which case every other cache entry was purged.
    pub fn observe(&self, version: &str) -> bool {
        let previous = self.storage.get(APP_VERSION_KEY);
        let changed = matches!(previous.as_deref(), Some(prev) if prev != version);

        if changed {
            let removed = self.storage.retain(|key| key == APP_VERSION_KEY);
            self.context.reset();
            metrics::record_cache_invalidation(removed);
            tracing::info!(
                previous = previous.as_deref().unwrap_or_default(),
                current = version,
                removed,
                "New version detected, cache purged"
            );
        }

        self.storage.set(APP_VERSION_KEY, version);
        changed
    }

    /// Last observed version marker.
    pub fn current(&self) -> Option<String> {
        self.storage.get(APP_VERSION_KEY)
    }
}
