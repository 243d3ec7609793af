//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pipeline components produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (fetch outcome counters)
//!
//! Consumers:
//!     → stderr (fmt layer, filtered by RUST_LOG or config)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every fetch records which tier answered it
//! - Failures are diagnostic only; nothing here can fail a fetch

pub mod logging;
pub mod metrics;
