//! Tiered data access.
//!
//! # Responsibilities
//! - Serve a resource from the master document when it carries one
//! - Otherwise serve from cache, then the primary source, then the local fallback
//! - Keep the master cache warm with background refreshes
//! - Never fail: total failure is an empty result
//!
//! # Design Decisions
//! - Cache-exempt resources (`services` by default) always go to the network
//! - Fallback data is returned as-is and never written to the cache
//! - A background refresh only ever writes the cache

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinSet;
use url::Url;

use crate::cache::{
    entry_key, now_millis, CacheEntry, LocalStorage, StorageError, APP_VERSION_KEY,
    MASTER_CACHE_KEY, MASTER_TIMESTAMP_KEY,
};
use crate::config::{SiteDataConfig, TimeoutConfig};
use crate::data::{csv, ConfigMap, MasterData, ResourceType, Row, SiteContext, VersionGate};
use crate::net::{SourceError, SourceFetcher, SourceMap, SourceSpec};
use crate::observability::metrics;
use crate::resilience::timeouts::Budget;

/// Errors constructing a [`DataStore`]. Fetching itself never errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid source configuration: {0}")]
    Source(#[from] SourceError),

    #[error("cache storage unavailable: {0}")]
    Storage(#[from] StorageError),
}

/// Per-process fetch behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Skip every cache read. Writes still happen.
    pub nocache: bool,
}

impl FetchOptions {
    /// A `nocache` query parameter (any value) on the page URL bypasses cache reads.
    pub fn from_page_url(url: &Url) -> Self {
        Self {
            nocache: url.query_pairs().any(|(k, _)| k == "nocache"),
        }
    }
}

/// Which tier answered a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Master,
    Cache,
    Primary,
    Secondary,
    None,
}

impl FetchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchSource::Master => "master",
            FetchSource::Cache => "cache",
            FetchSource::Primary => "primary",
            FetchSource::Secondary => "secondary",
            FetchSource::None => "none",
        }
    }
}

struct StoreInner {
    sources: SourceMap,
    fetcher: SourceFetcher,
    storage: LocalStorage,
    context: Arc<SiteContext>,
    gate: VersionGate,
    timeouts: TimeoutConfig,
    ttl: Option<Duration>,
    exempt: HashSet<ResourceType>,
    options: FetchOptions,
}

/// Uniform accessor for every resource type.
#[derive(Clone)]
pub struct DataStore {
    inner: Arc<StoreInner>,
    refreshes: Arc<Mutex<JoinSet<()>>>,
}

impl DataStore {
    /// Build a store from configuration, opening the configured cache file.
    pub fn from_config(config: &SiteDataConfig, options: FetchOptions) -> Result<Self, StoreError> {
        let storage = if config.cache.persist {
            LocalStorage::load_from_file(&PathBuf::from(&config.cache.path))?
        } else {
            LocalStorage::in_memory()
        };
        let sources = SourceMap::from_config(&config.sources)?;
        let options = FetchOptions {
            nocache: options.nocache || config.cache.nocache,
        };
        Ok(Self::builder(sources, storage)
            .timeouts(config.timeouts.clone())
            .ttl(match config.cache.ttl_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            })
            .exempt(
                config
                    .cache
                    .exempt
                    .iter()
                    .filter_map(|name| name.parse().ok()),
            )
            .options(options)
            .build())
    }

    pub fn builder(sources: SourceMap, storage: LocalStorage) -> DataStoreBuilder {
        DataStoreBuilder {
            sources,
            storage,
            fetcher: SourceFetcher::new(),
            timeouts: TimeoutConfig::default(),
            ttl: Some(Duration::from_secs(24 * 60 * 60)),
            exempt: HashSet::from([ResourceType::Services]),
            options: FetchOptions::default(),
        }
    }

    /// Rows for `resource`; empty when no tier can provide any.
    pub async fn fetch(&self, resource: ResourceType) -> Vec<Row> {
        let (rows, source) = self.fetch_traced(resource).await;
        metrics::record_fetch(resource.as_str(), source.as_str());
        rows
    }

    /// Like [`fetch`](Self::fetch), also reporting which tier answered.
    pub async fn fetch_traced(&self, resource: ResourceType) -> (Vec<Row>, FetchSource) {
        if let Some(master) = self.master().await {
            if let Some(rows) = master.rows(resource) {
                tracing::debug!(resource = %resource, rows = rows.len(), "Served from master data");
                return (rows.to_vec(), FetchSource::Master);
            }
        }

        let inner = &self.inner;
        let cacheable = inner.is_cacheable(resource);

        if cacheable && !inner.options.nocache {
            if let Some(rows) = inner.read_cache(resource) {
                tracing::debug!(resource = %resource, rows = rows.len(), "Served from cache");
                return (rows, FetchSource::Cache);
            }
        }

        if let Some(spec) = inner.sources.primary(resource) {
            match inner.fetch_rows(spec, Budget::Interactive).await {
                Ok(rows) => {
                    if cacheable {
                        inner.write_cache(resource, &rows);
                    }
                    return (rows, FetchSource::Primary);
                }
                Err(e) => {
                    tracing::warn!(resource = %resource, error = %e, "Primary source failed, falling back");
                }
            }
        }

        if let Some(spec) = inner.sources.secondary(resource) {
            match inner.fetch_rows(spec, Budget::Interactive).await {
                Ok(rows) => return (rows, FetchSource::Secondary),
                Err(e) => {
                    tracing::warn!(resource = %resource, error = %e, "Fallback source failed");
                }
            }
        }

        tracing::warn!(resource = %resource, "No data available");
        (Vec::new(), FetchSource::None)
    }

    /// Site configuration from the `config` resource.
    pub async fn config(&self) -> ConfigMap {
        ConfigMap::from_rows(&self.fetch(ResourceType::Config).await)
    }

    /// Image file names in one assets manifest folder.
    pub async fn assets(&self, folder: &str) -> Vec<String> {
        match self.master().await {
            Some(master) => master.assets(folder).to_vec(),
            None => Vec::new(),
        }
    }

    /// The session's master document, loading it on first use.
    pub async fn master(&self) -> Option<Arc<MasterData>> {
        let inner = &self.inner;
        inner.sources.master()?;

        if let Some(master) = inner.context.master() {
            return Some(master);
        }

        let _guard = inner.context.lock_load().await;
        if let Some(master) = inner.context.master() {
            return Some(master);
        }
        if inner.context.attempted() {
            return None;
        }
        inner.context.mark_attempted();

        if !inner.options.nocache {
            if let Some(cached) = inner.read_master_cache() {
                let cached = Arc::new(cached);
                inner.context.populate(cached.clone());
                self.refresh_in_background();
                return Some(cached);
            }
        }

        match inner.refresh_master(Budget::Interactive).await {
            Ok(fresh) => {
                let fresh = Arc::new(fresh);
                inner.context.populate(fresh.clone());
                Some(fresh)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Master data unavailable, using per-resource sources");
                None
            }
        }
    }

    /// Spawn a master refresh under the background budget. Failures are ignored.
    pub fn refresh_in_background(&self) {
        let inner = self.inner.clone();
        let mut refreshes = self
            .refreshes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        refreshes.spawn(async move {
            match inner.refresh_master(Budget::Background).await {
                Ok(_) => {
                    tracing::debug!("Background refresh stored fresh master data");
                    metrics::record_background_refresh("ok");
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Background refresh failed");
                    metrics::record_background_refresh("failed");
                }
            }
        });
    }

    /// Wait for every outstanding background refresh.
    pub async fn settle(&self) {
        let mut pending = {
            let mut refreshes = self
                .refreshes
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            std::mem::take(&mut *refreshes)
        };

        while let Some(result) = pending.join_next().await {
            if let Err(e) = result {
                tracing::warn!(error = %e, "Background refresh task panicked");
            }
        }
    }

    /// Check the version marker, invalidating caches if it moved.
    ///
    /// With a master document configured its own version is the only marker:
    /// the document is loaded (and refreshed) instead of probing the version
    /// sheet, so the two never overwrite each other.
    pub async fn check_version(&self) {
        if self.inner.sources.master().is_some() {
            tracing::debug!("Version follows the master document");
            self.master().await;
            return;
        }
        self.inner.gate.check_version().await;
    }

    /// Forget the session's master document.
    pub fn reset(&self) {
        self.inner.context.reset();
    }

    pub fn version_gate(&self) -> &VersionGate {
        &self.inner.gate
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.inner.storage
    }

    pub fn context(&self) -> &Arc<SiteContext> {
        &self.inner.context
    }

    pub fn fetcher(&self) -> &SourceFetcher {
        &self.inner.fetcher
    }

    pub fn timeouts(&self) -> &TimeoutConfig {
        &self.inner.timeouts
    }
}

impl std::fmt::Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("sources", &self.inner.sources)
            .field("storage", &self.inner.storage)
            .field("ttl", &self.inner.ttl)
            .field("options", &self.inner.options)
            .finish()
    }
}

impl StoreInner {
    fn is_cacheable(&self, resource: ResourceType) -> bool {
        !self.exempt.contains(&resource)
    }

    async fn fetch_rows(&self, spec: &SourceSpec, budget: Budget) -> Result<Vec<Row>, SourceError> {
        let location = spec.locate()?;
        let text = self
            .fetcher
            .fetch_text(&location, self.timeouts.budget(budget))
            .await?;
        let rows = csv::parse(&text);
        if rows.is_empty() {
            return Err(SourceError::Empty(location.to_string()));
        }
        Ok(rows)
    }

    fn read_cache(&self, resource: ResourceType) -> Option<Vec<Row>> {
        let raw = self.storage.get(&entry_key(resource))?;
        let entry = match CacheEntry::from_json(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(resource = %resource, error = %e, "Discarding unreadable cache entry");
                self.storage.remove(&entry_key(resource));
                return None;
            }
        };

        let version = self.storage.get(APP_VERSION_KEY);
        if entry.is_usable(version.as_deref(), self.ttl, now_millis()) {
            Some(entry.rows)
        } else {
            tracing::debug!(resource = %resource, "Cache entry stale");
            None
        }
    }

    fn write_cache(&self, resource: ResourceType, rows: &[Row]) {
        let entry = CacheEntry::new(resource, rows.to_vec(), self.storage.get(APP_VERSION_KEY));
        match entry.to_json() {
            Ok(json) => self.storage.set(entry_key(resource), json),
            Err(e) => tracing::warn!(resource = %resource, error = %e, "Failed to serialize cache entry"),
        }
    }

    fn read_master_cache(&self) -> Option<MasterData> {
        let raw = self.storage.get(MASTER_CACHE_KEY)?;
        let written: u64 = self.storage.get(MASTER_TIMESTAMP_KEY)?.parse().ok()?;

        if let Some(ttl) = self.ttl {
            if now_millis().saturating_sub(written) >= ttl.as_millis() as u64 {
                tracing::debug!("Master cache expired");
                return None;
            }
        }

        match MasterData::from_json(&raw) {
            Ok(master) => Some(master),
            Err(e) => {
                tracing::debug!(error = %e, "Discarding unreadable master cache");
                self.storage.remove(MASTER_CACHE_KEY);
                None
            }
        }
    }

    /// Fetch the master document, observe its version, then cache it.
    async fn refresh_master(&self, budget: Budget) -> Result<MasterData, SourceError> {
        let Some(spec) = self.sources.master() else {
            return Err(SourceError::Empty("master data (not configured)".to_string()));
        };
        let location = spec.locate()?;
        let text = self
            .fetcher
            .fetch_text(&location, self.timeouts.budget(budget))
            .await?;
        let master = MasterData::from_json(&text).map_err(|e| SourceError::Malformed {
            location: location.to_string(),
            reason: e.to_string(),
        })?;

        if let Some(version) = master.version() {
            self.gate.observe(&version);
        }

        match serde_json::to_string(&master) {
            Ok(json) => {
                self.storage.set(MASTER_CACHE_KEY, json);
                self.storage
                    .set(MASTER_TIMESTAMP_KEY, now_millis().to_string());
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize master data"),
        }

        Ok(master)
    }
}

/// Assembles a [`DataStore`].
pub struct DataStoreBuilder {
    sources: SourceMap,
    storage: LocalStorage,
    fetcher: SourceFetcher,
    timeouts: TimeoutConfig,
    ttl: Option<Duration>,
    exempt: HashSet<ResourceType>,
    options: FetchOptions,
}

impl DataStoreBuilder {
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn exempt<I: IntoIterator<Item = ResourceType>>(mut self, exempt: I) -> Self {
        self.exempt = exempt.into_iter().collect();
        self
    }

    pub fn options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fetcher(mut self, fetcher: SourceFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn build(self) -> DataStore {
        let context = Arc::new(SiteContext::new());
        let gate = VersionGate::new(
            self.storage.clone(),
            context.clone(),
            self.fetcher.clone(),
            self.sources.primary(ResourceType::Version).cloned(),
            self.timeouts.budget(Budget::VersionCheck),
        );

        DataStore {
            inner: Arc::new(StoreInner {
                sources: self.sources,
                fetcher: self.fetcher,
                storage: self.storage,
                context,
                gate,
                timeouts: self.timeouts,
                ttl: self.ttl,
                exempt: self.exempt,
                options: self.options,
            }),
            refreshes: Arc::new(Mutex::new(JoinSet::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::SourceLocation;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("site-data-store-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn local(path: PathBuf) -> SourceSpec {
        SourceSpec::Fixed(SourceLocation::Local(path))
    }

    #[test]
    fn test_nocache_query_parameter() {
        let url = Url::parse("https://example.com/services?nocache").unwrap();
        assert!(FetchOptions::from_page_url(&url).nocache);
        let url = Url::parse("https://example.com/services?tab=bridal").unwrap();
        assert!(!FetchOptions::from_page_url(&url).nocache);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_sources() {
        let storage = LocalStorage::in_memory();
        let rows = csv::parse("author,text\nMira,Lovely");
        let entry = CacheEntry::new(ResourceType::Reviews, rows.clone(), None);
        storage.set(entry_key(ResourceType::Reviews), entry.to_json().unwrap());

        let store = DataStore::builder(SourceMap::new(), storage).build();
        let (fetched, source) = store.fetch_traced(ResourceType::Reviews).await;
        assert_eq!(source, FetchSource::Cache);
        assert_eq!(fetched, rows);
    }

    #[tokio::test]
    async fn test_nocache_ignores_cache() {
        let storage = LocalStorage::in_memory();
        let entry = CacheEntry::new(ResourceType::Reviews, csv::parse("a\n1"), None);
        storage.set(entry_key(ResourceType::Reviews), entry.to_json().unwrap());

        let store = DataStore::builder(SourceMap::new(), storage)
            .options(FetchOptions { nocache: true })
            .build();
        let (rows, source) = store.fetch_traced(ResourceType::Reviews).await;
        assert!(rows.is_empty());
        assert_eq!(source, FetchSource::None);
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let dir = scratch("fallback");
        let path = dir.join("team.csv");
        std::fs::write(&path, "name,role\nAsha,Founder\n").unwrap();

        let storage = LocalStorage::in_memory();
        let sources = SourceMap::new()
            .with_primary(ResourceType::Team, local(dir.join("missing.csv")))
            .with_secondary(ResourceType::Team, local(path));
        let store = DataStore::builder(sources, storage.clone()).build();

        let (rows, source) = store.fetch_traced(ResourceType::Team).await;
        assert_eq!(source, FetchSource::Secondary);
        assert_eq!(rows[0].get("name"), Some("Asha"));
        assert!(storage.get("cached_team").is_none());

        // Cleanup
        std::fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_primary_success_is_cached_unless_exempt() {
        let dir = scratch("primary");
        std::fs::write(dir.join("reviews.csv"), "author,text\nJo,Great eye\n").unwrap();
        std::fs::write(dir.join("services.csv"), "title,category\nGlow,Bridal\n").unwrap();

        let storage = LocalStorage::in_memory();
        let sources = SourceMap::new()
            .with_primary(ResourceType::Reviews, local(dir.join("reviews.csv")))
            .with_primary(ResourceType::Services, local(dir.join("services.csv")));
        let store = DataStore::builder(sources, storage.clone()).build();

        assert_eq!(store.fetch(ResourceType::Reviews).await.len(), 1);
        assert_eq!(store.fetch(ResourceType::Services).await.len(), 1);
        assert!(storage.get("cached_reviews").is_some());
        assert!(storage.get("cached_services").is_none());

        // Cleanup
        std::fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[tokio::test]
    async fn test_master_document_takes_precedence() {
        let dir = scratch("master");
        std::fs::write(
            dir.join("site-data.json"),
            r#"{"version":[{"value":"5"}],"reviews":[{"author":"Mira","text":"Lovely"}],
                "assets_manifest":{"portfolio":["one.jpg"]}}"#,
        )
        .unwrap();
        std::fs::write(dir.join("team.csv"), "name\nAsha\n").unwrap();

        let storage = LocalStorage::in_memory();
        let sources = SourceMap::new()
            .with_master(local(dir.join("site-data.json")))
            .with_secondary(ResourceType::Team, local(dir.join("team.csv")));
        let store = DataStore::builder(sources, storage.clone()).build();

        let (rows, source) = store.fetch_traced(ResourceType::Reviews).await;
        assert_eq!(source, FetchSource::Master);
        assert_eq!(rows[0].get("author"), Some("Mira"));

        // Types absent from the master document use their own sources.
        let (rows, source) = store.fetch_traced(ResourceType::Team).await;
        assert_eq!(source, FetchSource::Secondary);
        assert_eq!(rows.len(), 1);

        assert_eq!(store.assets("portfolio").await, vec!["one.jpg".to_string()]);
        assert_eq!(storage.get(APP_VERSION_KEY).as_deref(), Some("5"));
        assert!(storage.get(MASTER_CACHE_KEY).is_some());

        // Cleanup
        std::fs::remove_dir_all(&dir).unwrap_or_default();
    }
}
