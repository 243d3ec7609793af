//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Read from a source:
//!     → timeouts.rs (pick the budget, enforce the deadline)
//!     → On failure: caller falls through to the next tier
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Interactive, background and version-check reads get separate budgets

pub mod timeouts;
