//! In-memory expiring cache for fetched image bytes
//!
//! Wraps a remote fetch with a TTL-bounded memory of previous results. The
//! proxy keeps two instances: one keyed by manga id for covers and one keyed
//! by (chapter id, page index) for chapter pages.

use bytes::Bytes;
use moka::future::Cache;
use serde::Serialize;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Image bytes with their upstream content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub content_type: String,
    pub body: Bytes,
}

/// Statistics about one cache instance
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
}

/// A bounded TTL cache in front of an image fetch
///
/// Entries expire after the configured time-to-live and are re-fetched on
/// the next access. Concurrent misses for the same key are coalesced into a
/// single upstream fetch; fetch failures are propagated to all waiters and
/// never stored.
pub struct ImageCache<K> {
    cache: Cache<K, Arc<ImageData>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K> ImageCache<K>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
{
    /// Create a cache holding at most `max_entries` images for `ttl` each
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached image for `key`, fetching it on a miss
    ///
    /// The boolean is true when the image came from the cache without
    /// invoking `fetch`; a caller that joins an in-flight fetch for the same
    /// key shares its result and also counts as a hit, since it performed no
    /// upstream call of its own. Expired entries are treated as misses and
    /// overwritten with the fresh result.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: K,
        fetch: F,
    ) -> Result<(Arc<ImageData>, bool), Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ImageData, E>>,
        E: Send + Sync + 'static,
    {
        let entry = self
            .cache
            .entry(key)
            .or_try_insert_with(async move { fetch().await.map(Arc::new) })
            .await?;

        // is_fresh is true only for the caller whose fetch populated the
        // entry; everyone else, joiners included, got served from the cache.
        let from_cache = !entry.is_fresh();
        if from_cache {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok((entry.into_value(), from_cache))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
