//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SiteDataConfig (validated, immutable)
//!     → handed to DataStore / SyncEngine at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::CacheConfig;
pub use schema::ObservabilityConfig;
pub use schema::SiteDataConfig;
pub use schema::SourceConfig;
pub use schema::TimeoutConfig;
