//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every source key names a known resource type
//! - Validate value ranges (timeouts > 0, version budget within fetch budget)
//! - Check URLs and the metrics address parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteDataConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::SiteDataConfig;
use crate::data::ResourceType;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("timeouts.version_ms ({version_ms}) must not exceed timeouts.fetch_ms ({fetch_ms})")]
    VersionBudgetTooLong { version_ms: u64, fetch_ms: u64 },

    #[error("{table} names unknown resource type '{name}'")]
    UnknownResource { table: &'static str, name: String },

    #[error("sources.sheets_base_url '{0}' is not a valid URL")]
    InvalidBaseUrl(String),

    #[error("sources.spreadsheet_id is empty but sheets are configured")]
    MissingSpreadsheetId,

    #[error("{table}.{name} has an empty location")]
    EmptyLocation { table: &'static str, name: String },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("cache.path is empty while cache.persist is enabled")]
    MissingCachePath,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &SiteDataConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let timeouts = &config.timeouts;
    for (name, value) in [
        ("fetch_ms", timeouts.fetch_ms),
        ("refresh_ms", timeouts.refresh_ms),
        ("version_ms", timeouts.version_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }
    if timeouts.version_ms > timeouts.fetch_ms {
        errors.push(ValidationError::VersionBudgetTooLong {
            version_ms: timeouts.version_ms,
            fetch_ms: timeouts.fetch_ms,
        });
    }

    let sources = &config.sources;
    if !sources.sheets.is_empty() {
        if Url::parse(&sources.sheets_base_url).is_err() {
            errors.push(ValidationError::InvalidBaseUrl(sources.sheets_base_url.clone()));
        }
        if sources.spreadsheet_id.trim().is_empty() {
            errors.push(ValidationError::MissingSpreadsheetId);
        }
    }

    for (table, entries) in [("sources.sheets", &sources.sheets), ("sources.local", &sources.local)] {
        for (name, location) in entries {
            if name.parse::<ResourceType>().is_err() {
                errors.push(ValidationError::UnknownResource {
                    table,
                    name: name.clone(),
                });
            }
            if location.trim().is_empty() {
                errors.push(ValidationError::EmptyLocation {
                    table,
                    name: name.clone(),
                });
            }
        }
    }

    for name in &config.cache.exempt {
        if name.parse::<ResourceType>().is_err() {
            errors.push(ValidationError::UnknownResource {
                table: "cache.exempt",
                name: name.clone(),
            });
        }
    }
    if config.cache.persist && config.cache.path.trim().is_empty() {
        errors.push(ValidationError::MissingCachePath);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&SiteDataConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = SiteDataConfig::default();
        config.timeouts.fetch_ms = 0;
        config.sources.sheets.insert("pricing".into(), "123".into());
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "not-an-address".into();

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::ZeroTimeout("fetch_ms")));
        assert!(errors.contains(&ValidationError::VersionBudgetTooLong {
            version_ms: 3_000,
            fetch_ms: 0
        }));
        assert!(errors.contains(&ValidationError::UnknownResource {
            table: "sources.sheets",
            name: "pricing".into()
        }));
        assert!(errors.contains(&ValidationError::InvalidMetricsAddress(
            "not-an-address".into()
        )));
    }

    #[test]
    fn test_sheets_require_spreadsheet_id() {
        let mut config = SiteDataConfig::default();
        config.sources.spreadsheet_id = "  ".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingSpreadsheetId]);
    }
}
