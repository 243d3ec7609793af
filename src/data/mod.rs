//! Data acquisition subsystem.
//!
//! # Data Flow
//! ```text
//! fetch(resource):
//!     → master document (loaded once per session, contains the type?)
//!     → cache entry (unless nocache or exempt, valid for current version)
//!     → primary source (spreadsheet CSV, interactive timeout) → cache
//!     → secondary source (local CSV)
//!     → empty
//!
//! check_version():
//!     → master document configured? load it, its version is the marker
//!     → else version sheet → compare with stored marker → purge on change
//! ```
//!
//! # Design Decisions
//! - Fetching never fails; each failure falls through to the next tier
//! - Session state lives in an explicit `SiteContext`, not globals
//! - All values are strings; no type inference

pub mod config_map;
pub mod context;
pub mod csv;
pub mod master;
pub mod resource;
pub mod row;
pub mod store;
pub mod version;

pub use config_map::ConfigMap;
pub use context::SiteContext;
pub use master::MasterData;
pub use resource::{ResourceType, UnknownResource, ASSETS_MANIFEST_KEY};
pub use row::Row;
pub use store::{DataStore, FetchOptions, FetchSource, StoreError};
pub use version::{extract_version, VersionGate};
