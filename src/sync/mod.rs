//! Maintenance tooling for the master document.
//!
//! # Design Decisions
//! - Comparison is order-independent and ignores whitespace and line endings
//! - A sheet that fails to fetch never overwrites existing data
//! - Version control of the written document is left to the operator

pub mod diff;
pub mod engine;
pub mod manifest;
pub mod normalize;

pub use engine::{DiffReport, SyncEngine, SyncError, SyncReport};
