//! Site data acquisition library.

pub mod cache;
pub mod config;
pub mod data;
pub mod net;
pub mod observability;
pub mod page;
pub mod resilience;
pub mod sync;
pub mod views;

pub use config::schema::SiteDataConfig;
pub use data::{DataStore, FetchOptions, ResourceType, Row};
