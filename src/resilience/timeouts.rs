//! Timeout enforcement.
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::config::TimeoutConfig;
use crate::net::SourceError;

/// Which deadline a read runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// A caller is waiting on the result.
    Interactive,
    /// Keeping the cache warm; nobody is waiting.
    Background,
    /// Startup version probe.
    VersionCheck,
}

impl TimeoutConfig {
    pub fn budget(&self, budget: Budget) -> Duration {
        let ms = match budget {
            Budget::Interactive => self.fetch_ms,
            Budget::Background => self.refresh_ms,
            Budget::VersionCheck => self.version_ms,
        };
        Duration::from_millis(ms)
    }
}

/// Run `fut`, mapping an elapsed deadline to [`SourceError::Timeout`].
pub async fn deadline<T, F>(limit: Duration, fut: F) -> Result<T, SourceError>
where
    F: Future<Output = Result<T, SourceError>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::Timeout(limit)),
    }
}
