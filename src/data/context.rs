//! Session state for the master document.
//!
//! # States
//! ```text
//! Unloaded ──load attempt──▶ Loaded(master)
//!     │                          │
//!     └──attempt failed──▶ Unavailable (per-type sources only)
//!
//! reset(): any state → Unloaded
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::{Mutex, MutexGuard};

use crate::data::MasterData;

/// Holds the session's master document. Shared by the store and the version gate.
#[derive(Debug)]
pub struct SiteContext {
    master: ArcSwapOption<MasterData>,
    attempted: AtomicBool,
    load_lock: Mutex<()>,
}

impl SiteContext {
    pub fn new() -> Self {
        Self {
            master: ArcSwapOption::from(None),
            attempted: AtomicBool::new(false),
            load_lock: Mutex::new(()),
        }
    }

    pub fn master(&self) -> Option<Arc<MasterData>> {
        self.master.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.master.load().is_some()
    }

    pub fn populate(&self, master: Arc<MasterData>) {
        self.master.store(Some(master));
        self.attempted.store(true, Ordering::SeqCst);
    }

    /// Drop the loaded document and allow another load attempt.
    pub fn reset(&self) {
        self.master.store(None);
        self.attempted.store(false, Ordering::SeqCst);
    }

    pub(crate) fn attempted(&self) -> bool {
        self.attempted.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_attempted(&self) {
        self.attempted.store(true, Ordering::SeqCst);
    }

    /// Serializes load attempts so concurrent fetches trigger one load.
    pub(crate) async fn lock_load(&self) -> MutexGuard<'_, ()> {
        self.load_lock.lock().await
    }
}

impl Default for SiteContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let context = SiteContext::new();
        assert!(!context.is_loaded());
        assert!(!context.attempted());

        context.populate(Arc::new(MasterData::default()));
        assert!(context.is_loaded());
        assert!(context.attempted());

        context.reset();
        assert!(context.master().is_none());
        assert!(!context.attempted());
    }
}
