//! Source access subsystem.
//!
//! # Data Flow
//! ```text
//! SourceConfig
//!     → sources.rs (resource → primary / secondary / master spec)
//!     → sheets.rs (sheet spec → CSV export URL, fresh `t=` per read)
//!     → source.rs (read URL or file within a deadline)
//!     → text, or SourceError for the caller to fall back on
//! ```
//!
//! # Design Decisions
//! - Every read has a deadline; a timeout is an ordinary failure
//! - Non-success status and blank payloads count as failures

pub mod sheets;
pub mod source;
pub mod sources;

pub use source::{SourceError, SourceFetcher, SourceLocation};
pub use sources::{SourceMap, SourceSpec};
