//! Page configuration binding.
//!
//! # Data Flow
//! ```text
//! HTML page → document.rs (marker elements + meta tags)
//! ConfigMap + Document → apply.rs → mutated Document + ApplyReport
//! ```

pub mod apply;
pub mod document;

pub use apply::{ApplyReport, ConfigApplier, MarkerKind, Strictness};
pub use document::{Document, Element, MetaAttr, MetaTag, PageError};
