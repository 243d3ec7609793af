//! Version-marker cache invalidation tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use site_data::cache::{entry_key, LocalStorage, APP_VERSION_KEY, MASTER_CACHE_KEY};
use site_data::config::TimeoutConfig;
use site_data::data::{DataStore, FetchSource, ResourceType};
use site_data::net::{SourceLocation, SourceMap, SourceSpec};
use url::Url;

mod common;

fn remote(addr: std::net::SocketAddr, path: &str) -> SourceSpec {
    SourceSpec::Fixed(SourceLocation::Remote(
        Url::parse(&format!("http://{}{}", addr, path)).unwrap(),
    ))
}

fn timeouts() -> TimeoutConfig {
    TimeoutConfig {
        fetch_ms: 500,
        refresh_ms: 1_000,
        version_ms: 500,
    }
}

#[tokio::test]
async fn test_version_change_clears_cache_before_next_fetch() {
    let version = Arc::new(AtomicU32::new(1));
    let review_hits = Arc::new(AtomicU32::new(0));
    let (v, hits) = (version.clone(), review_hits.clone());
    let addr = common::start_programmable_backend(move |path| {
        let (v, hits) = (v.clone(), hits.clone());
        async move {
            if path.starts_with("/version") {
                (200, format!("key,value\nversion,{}", v.load(Ordering::SeqCst)))
            } else {
                hits.fetch_add(1, Ordering::SeqCst);
                (200, "author,text\nMira,Lovely".to_string())
            }
        }
    })
    .await;

    let storage = LocalStorage::in_memory();
    let sources = SourceMap::new()
        .with_primary(ResourceType::Version, remote(addr, "/version"))
        .with_primary(ResourceType::Reviews, remote(addr, "/reviews"));
    let store = DataStore::builder(sources, storage.clone())
        .fetcher(common::direct_fetcher())
        .timeouts(timeouts())
        .build();

    store.check_version().await;
    assert_eq!(storage.get(APP_VERSION_KEY).as_deref(), Some("1"));

    store.fetch(ResourceType::Reviews).await;
    assert!(storage.get(&entry_key(ResourceType::Reviews)).is_some());
    storage.set(MASTER_CACHE_KEY, "{}");

    // Same version: nothing purged, cache still answers.
    store.check_version().await;
    assert_eq!(store.fetch_traced(ResourceType::Reviews).await.1, FetchSource::Cache);
    assert_eq!(review_hits.load(Ordering::SeqCst), 1);

    version.store(2, Ordering::SeqCst);
    store.check_version().await;
    assert_eq!(storage.keys(), vec![APP_VERSION_KEY.to_string()]);
    assert_eq!(storage.get(APP_VERSION_KEY).as_deref(), Some("2"));

    assert_eq!(store.fetch_traced(ResourceType::Reviews).await.1, FetchSource::Primary);
    assert_eq!(review_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_unreachable_version_source_keeps_cache() {
    let addr = common::start_programmable_backend(|_| async { (503, "down".to_string()) }).await;

    let storage = LocalStorage::in_memory();
    storage.set(APP_VERSION_KEY, "7");
    storage.set(entry_key(ResourceType::Team), "{}");

    let sources = SourceMap::new().with_primary(ResourceType::Version, remote(addr, "/version"));
    let store = DataStore::builder(sources, storage.clone())
        .fetcher(common::direct_fetcher())
        .timeouts(timeouts())
        .build();

    store.check_version().await;
    assert_eq!(storage.get(APP_VERSION_KEY).as_deref(), Some("7"));
    assert_eq!(storage.len(), 2);
}

#[tokio::test]
async fn test_cache_written_under_old_version_is_not_served() {
    let addr = common::start_programmable_backend(|_| async {
        (200, "name,role\nAsha,Founder".to_string())
    })
    .await;

    let dir = common::scratch_dir("persisted");
    let cache_path = dir.join("cache.json");

    {
        let storage = LocalStorage::new(Some(cache_path.clone()));
        storage.set(APP_VERSION_KEY, "1");
        let sources = SourceMap::new().with_primary(ResourceType::Team, remote(addr, "/team"));
        let store = DataStore::builder(sources, storage)
            .fetcher(common::direct_fetcher())
            .build();
        assert_eq!(store.fetch_traced(ResourceType::Team).await.1, FetchSource::Primary);
    }

    // Reopen from disk with a newer marker recorded out of band.
    let storage = LocalStorage::load_from_file(&cache_path).unwrap();
    assert!(storage.get(&entry_key(ResourceType::Team)).is_some());
    storage.set(APP_VERSION_KEY, "2");

    let sources = SourceMap::new().with_primary(ResourceType::Team, remote(addr, "/team"));
    let store = DataStore::builder(sources, storage)
        .fetcher(common::direct_fetcher())
        .build();
    assert_eq!(store.fetch_traced(ResourceType::Team).await.1, FetchSource::Primary);

    // Cleanup
    std::fs::remove_dir_all(&dir).unwrap_or_default();
}

#[tokio::test]
async fn test_master_version_wins_over_version_sheet() {
    let master_hits = Arc::new(AtomicU32::new(0));
    let sheet_hits = Arc::new(AtomicU32::new(0));
    let (masters, sheets) = (master_hits.clone(), sheet_hits.clone());
    let addr = common::start_programmable_backend(move |path| {
        let (masters, sheets) = (masters.clone(), sheets.clone());
        async move {
            if path.starts_with("/version") {
                sheets.fetch_add(1, Ordering::SeqCst);
                (200, "key,value\nversion,2".to_string())
            } else {
                let n = masters.fetch_add(1, Ordering::SeqCst) + 1;
                (
                    200,
                    format!(
                        r#"{{"version":[{{"value":"1"}}],"reviews":[{{"author":"Mira","text":"Visit {}"}}]}}"#,
                        n
                    ),
                )
            }
        }
    })
    .await;

    let storage = LocalStorage::in_memory();
    storage.set(entry_key(ResourceType::Team), "{}");
    let sources = SourceMap::new()
        .with_master(remote(addr, "/configs/site-data.json"))
        .with_primary(ResourceType::Version, remote(addr, "/version"));

    for session in 1..=3u32 {
        let store = DataStore::builder(sources.clone(), storage.clone())
            .fetcher(common::direct_fetcher())
            .timeouts(timeouts())
            .build();

        store.check_version().await;
        assert_eq!(storage.get(APP_VERSION_KEY).as_deref(), Some("1"));
        assert!(storage.get(MASTER_CACHE_KEY).is_some());

        let (rows, source) = store.fetch_traced(ResourceType::Reviews).await;
        assert_eq!(source, FetchSource::Master);
        if session > 1 {
            // Served from the cache written by the previous session.
            assert_eq!(rows[0].get("text"), Some(format!("Visit {}", session - 1).as_str()));
        }
        store.settle().await;
        assert_eq!(master_hits.load(Ordering::SeqCst), session);
    }

    assert_eq!(sheet_hits.load(Ordering::SeqCst), 0);
    assert_eq!(storage.get(APP_VERSION_KEY).as_deref(), Some("1"));
    assert!(storage.get(&entry_key(ResourceType::Team)).is_some());
}
