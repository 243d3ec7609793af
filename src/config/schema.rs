//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the data
//! pipeline. All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the site data pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SiteDataConfig {
    /// Where each resource type is fetched from.
    pub sources: SourceConfig,

    /// Timeout budgets for network calls.
    pub timeouts: TimeoutConfig,

    /// Durable cache settings.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Primary, secondary and aggregate source locations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the published spreadsheet service.
    pub sheets_base_url: String,

    /// Published spreadsheet identifier (may contain `/`).
    pub spreadsheet_id: String,

    /// Resource type name → sheet gid.
    pub sheets: BTreeMap<String, String>,

    /// Resource type name → local fallback path (relative to `site_root`) or URL.
    pub local: BTreeMap<String, String>,

    /// Aggregate master document, path or URL. `None` disables the master tier.
    pub master_data: Option<String>,

    /// Directory relative paths are resolved against.
    pub site_root: String,
}

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

impl Default for SourceConfig {
    fn default() -> Self {
        let sheets = [
            ("version", "2024034979"),
            ("config", "1515187439"),
            ("services", "439228131"),
            ("reviews", "1697858749"),
            ("team", "1489131428"),
            ("dialogs", "49430965"),
        ];
        let local = [
            ("config", "configs/config.csv"),
            ("services", "configs/services.csv"),
            ("reviews", "configs/reviews.csv"),
            ("team", "configs/team.csv"),
        ];

        Self {
            sheets_base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            spreadsheet_id:
                "e/2PACX-1vSfDsGSiXAvQMmO32s5qWgQaH1GDeZXqEbnMr7bQmm-7gtdoHX-pz_jNq_y3Mb_ahS1LJ99azA84HVZ"
                    .to_string(),
            sheets: sheets
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            local: local
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            master_data: Some("configs/site-data.json".to_string()),
            site_root: ".".to_string(),
        }
    }
}

/// Timeout configuration, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Interactive fetch budget (a caller is waiting on the result).
    pub fetch_ms: u64,

    /// Background refresh budget.
    pub refresh_ms: u64,

    /// Version check budget. Kept short so startup is not held up.
    pub version_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            fetch_ms: 8_000,
            refresh_ms: 15_000,
            version_ms: 3_000,
        }
    }
}

/// Durable cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Write cache entries through to `path`.
    pub persist: bool,

    /// Cache file location.
    pub path: String,

    /// Entry lifetime in seconds. 0 disables expiry.
    pub ttl_secs: u64,

    /// Resource types never read from or written to the cache.
    pub exempt: Vec<String>,

    /// Skip every cache read for this process.
    pub nocache: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            persist: true,
            path: ".site-data/cache.json".to_string(),
            ttl_secs: 24 * 60 * 60,
            exempt: vec!["services".to_string()],
            nocache: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
