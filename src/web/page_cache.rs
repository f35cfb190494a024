//! Rendered page cache for listing pages.
//!
//! Listing pages are cached by request path with a TTL. Action handlers
//! invalidate the paths their writes affect through [`ViewCache`], so a
//! redirect after a write renders fresh data.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Invalidation interface handed to action handlers.
pub trait ViewCache: Send + Sync {
    /// Drop any cached rendering of `path`.
    fn invalidate(&self, path: &str);
}

/// A cached rendering of one page.
#[derive(Debug, Clone)]
struct CachedPage {
    html: String,
    cached_at: Instant,
}

impl CachedPage {
    fn is_valid(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() < ttl
    }
}

/// In-memory page cache keyed by path.
#[derive(Debug)]
pub struct PageCache {
    pages: RwLock<HashMap<String, CachedPage>>,
    ttl: Duration,
}

impl PageCache {
    /// Create a new page cache. A zero TTL disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Get the cached HTML for `path` if it has not expired.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let pages = self.pages.read().unwrap_or_else(PoisonError::into_inner);
        pages
            .get(path)
            .filter(|page| page.is_valid(self.ttl))
            .map(|page| page.html.clone())
    }

    /// Store the rendered HTML for `path`.
    pub fn insert(&self, path: &str, html: String) {
        if !self.is_enabled() {
            return;
        }
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        pages.insert(
            path.to_string(),
            CachedPage {
                html,
                cached_at: Instant::now(),
            },
        );
    }

    /// Number of entries currently held, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ViewCache for PageCache {
    fn invalidate(&self, path: &str) {
        let removed = self
            .pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(path)
            .is_some();
        tracing::debug!(path, removed, "Invalidated cached page");
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(60))
    }
}
