//! Invitation-only access gate.
//!
//! The access list is read live on every attempt and never cached.

use std::time::Duration;

use thiserror::Error;

use crate::data::{csv, ConfigMap, Row};
use crate::net::sheets::sheet_url;
use crate::net::{SourceError, SourceFetcher, SourceLocation};

pub const ACCESS_SPREADSHEET_ID_KEY: &str = "ACCESS_SPREADSHEET_ID";
pub const ACCESS_GID_KEY: &str = "ACCESS_GID";

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("access configuration missing (ACCESS_SPREADSHEET_ID / ACCESS_GID)")]
    MissingConfig,

    #[error("failed to fetch live access list: {0}")]
    Fetch(#[from] SourceError),
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    fetcher: SourceFetcher,
    base_url: String,
    limit: Duration,
}

impl AccessGate {
    pub fn new(fetcher: SourceFetcher, base_url: impl Into<String>, limit: Duration) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            limit,
        }
    }

    /// Check credentials against the access sheet named in `config`.
    pub async fn verify(&self, config: &ConfigMap, email: &str, otp: &str) -> Result<bool, AccessError> {
        let spreadsheet_id = config
            .get(ACCESS_SPREADSHEET_ID_KEY)
            .filter(|v| !v.is_empty())
            .ok_or(AccessError::MissingConfig)?;
        let gid = config
            .get(ACCESS_GID_KEY)
            .filter(|v| !v.is_empty())
            .ok_or(AccessError::MissingConfig)?;

        let url = sheet_url(&self.base_url, spreadsheet_id, gid)?;
        let text = self
            .fetcher
            .fetch_text(&SourceLocation::Remote(url), self.limit)
            .await?;

        let granted = is_listed(&csv::parse(&text), email, otp);
        tracing::info!(granted, "Access check completed");
        Ok(granted)
    }
}

/// Email matches case-insensitively; both fields ignore surrounding whitespace.
pub fn is_listed(rows: &[Row], email: &str, otp: &str) -> bool {
    let email = email.trim().to_lowercase();
    let otp = otp.trim();
    rows.iter()
        .any(|row| row.field("email").trim().to_lowercase() == email && row.field("otp") == otp)
}
