//! Durable key-value storage backing the cache.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Process-local string store, optionally written through to a JSON file.
///
/// Cloning shares the same underlying map. Writes are last-write-wins.
#[derive(Clone, Default)]
pub struct LocalStorage {
    inner: Arc<DashMap<String, String>>,
    persistence_path: Option<PathBuf>,
    write_lock: Arc<Mutex<()>>,
}

impl LocalStorage {
    /// Create a new empty store.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// In-memory only store.
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// Load from file if it exists; the file becomes the write-through target.
    pub fn load_from_file(path: &Path) -> Result<Self, StorageError> {
        let storage = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let map: HashMap<String, String> = serde_json::from_reader(reader)?;
            for (k, v) in map {
                storage.inner.insert(k, v);
            }
            tracing::debug!(entries = storage.inner.len(), path = %path.display(), "Loaded cache storage");
        }
        Ok(storage)
    }

    /// Save to file.
    pub fn save_to_file(&self) -> Result<(), StorageError> {
        let Some(path) = &self.persistence_path else {
            return Ok(());
        };
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let map: HashMap<_, _> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        let tmp = path.with_extension("tmp");
        {
            let writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer(writer, &map)?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), value.into());
        self.flush();
    }

    pub fn remove(&self, key: &str) -> bool {
        let removed = self.inner.remove(key).is_some();
        if removed {
            self.flush();
        }
        removed
    }

    /// Keep only keys for which `keep` returns true. Returns how many were removed.
    pub fn retain<F>(&self, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.inner.len();
        self.inner.retain(|k, _| keep(k.as_str()));
        let removed = before.saturating_sub(self.inner.len());
        if removed > 0 {
            self.flush();
        }
        removed
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    // Persistence failures never fail the caller; the in-memory map stays authoritative.
    fn flush(&self) {
        if let Err(e) = self.save_to_file() {
            tracing::warn!(error = %e, "Failed to persist cache storage");
        }
    }
}

impl std::fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStorage")
            .field("entries", &self.inner.len())
            .field("persistence_path", &self.persistence_path)
            .finish()
    }
}
