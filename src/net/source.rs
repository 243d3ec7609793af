//! Source locations and text fetching.
//!
//! # Responsibilities
//! - Resolve configured locations to a remote URL or a local file
//! - Read a location's text within a deadline
//! - Treat non-success status and blank payloads as failures

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::resilience::timeouts::deadline;

/// Errors that can occur while reading a source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The read did not finish within its budget.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("empty payload from {0}")]
    Empty(String),

    #[error("malformed payload from {location}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("invalid source URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Where a dataset lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(Url),
    Local(PathBuf),
}

impl SourceLocation {
    /// `http(s)://` specs become URLs; anything else is a path under `site_root`.
    pub fn resolve(spec: &str, site_root: &Path) -> Result<Self, SourceError> {
        let spec = spec.trim();
        if spec.starts_with("http://") || spec.starts_with("https://") {
            Url::parse(spec)
                .map(SourceLocation::Remote)
                .map_err(|e| SourceError::InvalidUrl {
                    url: spec.to_string(),
                    reason: e.to_string(),
                })
        } else {
            Ok(SourceLocation::Local(site_root.join(spec)))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Remote(url) => write!(f, "{}", url),
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Reads source text over HTTP or from disk.
#[derive(Debug, Clone, Default)]
pub struct SourceFetcher {
    client: reqwest::Client,
}

impl SourceFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("site-data/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Read `location`, failing with [`SourceError::Timeout`] once `limit` elapses.
    pub async fn fetch_text(&self, location: &SourceLocation, limit: Duration) -> Result<String, SourceError> {
        deadline(limit, self.read(location)).await
    }

    async fn read(&self, location: &SourceLocation) -> Result<String, SourceError> {
        let text = match location {
            SourceLocation::Remote(url) => {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(SourceError::Status {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                response.text().await?
            }
            SourceLocation::Local(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?,
        };

        if text.trim().is_empty() {
            return Err(SourceError::Empty(location.to_string()));
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_locations() {
        let root = Path::new("/srv/site");
        assert_eq!(
            SourceLocation::resolve("configs/services.csv", root).unwrap(),
            SourceLocation::Local(PathBuf::from("/srv/site/configs/services.csv"))
        );
        assert!(matches!(
            SourceLocation::resolve("https://example.com/site-data.json", root).unwrap(),
            SourceLocation::Remote(_)
        ));
        assert!(matches!(
            SourceLocation::resolve("https://", root),
            Err(SourceError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let fetcher = SourceFetcher::new();
        let location = SourceLocation::Local(PathBuf::from("does-not-exist/reviews.csv"));
        let err = fetcher
            .fetch_text(&location, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("does-not-exist/reviews.csv"));
    }

    #[tokio::test]
    async fn test_blank_file_is_empty_error() {
        let path = std::env::temp_dir().join(format!("site-data-blank-{}.csv", std::process::id()));
        std::fs::write(&path, "  \n\n").unwrap();

        let fetcher = SourceFetcher::new();
        let err = fetcher
            .fetch_text(&SourceLocation::Local(path.clone()), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Empty(_)));

        // Cleanup
        std::fs::remove_file(&path).unwrap_or_default();
    }
}
