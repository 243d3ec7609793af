//! Sheet consolidation and drift reports.
//!
//! # Sync Flow
//! ```text
//! every primary sheet ──fetch──▶ rows (failed sheets skipped)
//! assets/images ──scan──▶ manifest
//! existing master ──compare (order-independent)──▶ changed?
//!     yes → write master document (pretty JSON)
//!     no  → leave file untouched
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::data::{csv, MasterData, ResourceType, Row};
use crate::net::{SourceFetcher, SourceMap};
use crate::sync::diff::{diff_csv, DIFF_KEYS};
use crate::sync::manifest::scan_assets;
use crate::sync::normalize::{normalize_cells, same_content};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid master document {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("master document not found at {}", .0.display())]
    MissingMaster(PathBuf),
}

impl SyncError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    /// Collections (and `assets_manifest`) whose content changed.
    pub changed: Vec<String>,
    /// Sheets that failed to fetch; their existing data is kept.
    pub skipped: Vec<ResourceType>,
    pub written: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffReport {
    pub in_sync: Vec<ResourceType>,
    pub files: Vec<PathBuf>,
    pub failed: Vec<ResourceType>,
}

impl DiffReport {
    pub fn all_match(&self) -> bool {
        self.files.is_empty() && self.failed.is_empty()
    }
}

pub struct SyncEngine {
    fetcher: SourceFetcher,
    sources: SourceMap,
    limit: Duration,
}

impl SyncEngine {
    pub fn new(fetcher: SourceFetcher, sources: SourceMap, limit: Duration) -> Self {
        Self {
            fetcher,
            sources,
            limit,
        }
    }

    async fn fetch_sheet(&self, resource: ResourceType) -> Option<Vec<Row>> {
        let spec = self.sources.primary(resource)?;
        let result = match spec.locate() {
            Ok(location) => self.fetcher.fetch_text(&location, self.limit).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(text) => Some(csv::parse_records(&text).iter().map(normalize_cells).collect()),
            Err(e) => {
                tracing::warn!(resource = %resource, error = %e, "Sheet fetch failed, skipping");
                None
            }
        }
    }

    /// Consolidate every sheet plus the assets manifest into `master_path`.
    pub async fn sync(&self, master_path: &Path, assets_root: &Path) -> Result<SyncReport, SyncError> {
        let existing = read_master(master_path).await?.unwrap_or_default();
        let mut updated = existing.clone();
        let mut report = SyncReport::default();

        for resource in self.sources.primary_resources() {
            tracing::info!(resource = %resource, "Fetching sheet");
            let Some(remote) = self.fetch_sheet(resource).await else {
                report.skipped.push(resource);
                continue;
            };
            let local = existing.rows(resource).unwrap_or(&[]);
            if !same_content(local, &remote) {
                report.changed.push(resource.to_string());
            }
            updated.insert(resource, remote);
        }

        let manifest = scan_assets(assets_root).map_err(|e| SyncError::io(assets_root, e))?;
        if manifest != existing.assets_manifest {
            report.changed.push(crate::data::ASSETS_MANIFEST_KEY.to_string());
        }
        updated.assets_manifest = manifest;

        if report.changed.is_empty() {
            tracing::info!("No changes against the local master document");
            return Ok(report);
        }

        let json = serde_json::to_string_pretty(&updated).map_err(|source| SyncError::Json {
            path: master_path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = master_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SyncError::io(parent, e))?;
        }
        tokio::fs::write(master_path, json)
            .await
            .map_err(|e| SyncError::io(master_path, e))?;

        report.written = true;
        tracing::info!(path = %master_path.display(), changed = ?report.changed, "Master document updated");
        Ok(report)
    }

    /// Write `<resource>_updates.csv` into `out_dir` for every diffable
    /// resource whose local rows drifted from the sheet.
    pub async fn diff(&self, master_path: &Path, out_dir: &Path) -> Result<DiffReport, SyncError> {
        let local = read_master(master_path)
            .await?
            .ok_or_else(|| SyncError::MissingMaster(master_path.to_path_buf()))?;
        tokio::fs::create_dir_all(out_dir)
            .await
            .map_err(|e| SyncError::io(out_dir, e))?;

        let mut report = DiffReport::default();
        for (resource, key_fields) in DIFF_KEYS {
            let Some(remote) = self.fetch_sheet(resource).await else {
                report.failed.push(resource);
                continue;
            };
            let local_rows = local.rows(resource).unwrap_or(&[]);

            match diff_csv(local_rows, &remote, key_fields) {
                Some(content) => {
                    let path = out_dir.join(format!("{}_updates.csv", resource));
                    tokio::fs::write(&path, content)
                        .await
                        .map_err(|e| SyncError::io(&path, e))?;
                    tracing::warn!(resource = %resource, path = %path.display(), "Differences detected");
                    report.files.push(path);
                }
                None => report.in_sync.push(resource),
            }
        }
        Ok(report)
    }
}

async fn read_master(path: &Path) -> Result<Option<MasterData>, SyncError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => MasterData::from_json(&text)
            .map(Some)
            .map_err(|source| SyncError::Json {
                path: path.to_path_buf(),
                source,
            }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SyncError::io(path, e)),
    }
}
