//! TTL cache implementation

use super::types::{CacheEntry, CacheStats, EntryStats};
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, trace};

/// TTL used when neither the call nor the cache specifies one
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Map a logical key onto its storage key
///
/// Percent-encodes everything outside `[A-Za-z0-9*-._]`, which is
/// injective: two distinct logical keys never share a storage key.
pub fn sanitize_key(key: &str) -> String {
    url::form_urlencoded::byte_serialize(key.as_bytes()).collect()
}

/// Get-or-compute cache with per-entry expiry
///
/// Concurrent misses on the same key are not deduplicated: each caller
/// runs its own fetcher and the last one to finish wins the slot. No lock
/// is held while a fetcher runs.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    default_ttl: Duration,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            default_ttl: self.default_ttl,
        }
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<V> TtlCache<V> {
    /// Create a cache with the given default TTL
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    /// Default TTL applied when a call does not pass one
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// True if `key` holds an unexpired entry
    ///
    /// An expired entry is evicted as a side effect.
    pub async fn has(&self, key: &str) -> bool {
        let storage_key = sanitize_key(key);
        {
            let entries = self.entries.read().await;
            match entries.get(&storage_key) {
                None => return false,
                Some(entry) if !entry.is_expired() => return true,
                Some(_) => {}
            }
        }

        self.evict_if_expired(&storage_key).await;
        false
    }

    /// Remove an entry; returns whether one was present
    pub async fn delete(&self, key: &str) -> bool {
        self.entries
            .write()
            .await
            .remove(&sanitize_key(key))
            .is_some()
    }

    /// Remove every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Evict all expired entries, returning how many were removed
    pub async fn clear_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!(evicted, "Evicted expired cache entries");
        }
        evicted
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Store `value` under `key`, replacing any previous entry
    pub async fn set(&self, key: &str, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry::new(key, value, ttl.unwrap_or(self.default_ttl));
        self.entries
            .write()
            .await
            .insert(sanitize_key(key), entry);
    }

    async fn evict_if_expired(&self, storage_key: &str) {
        let mut entries = self.entries.write().await;
        // Another caller may have stored a fresh entry since we looked
        if entries.get(storage_key).is_some_and(CacheEntry::is_expired) {
            trace!(key = storage_key, "Evicting expired cache entry");
            entries.remove(storage_key);
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Return the cached value for `key` if present and unexpired
    pub async fn get_cached(&self, key: &str) -> Option<V> {
        let storage_key = sanitize_key(key);
        {
            let entries = self.entries.read().await;
            match entries.get(&storage_key) {
                None => return None,
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        self.evict_if_expired(&storage_key).await;
        None
    }

    /// Return the cached value or compute, store and return a fresh one
    ///
    /// A failing fetcher stores nothing and its error is returned as-is.
    pub async fn get<F, Fut, E>(&self, key: &str, fetcher: F, ttl: Option<Duration>) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get_cached(key).await {
            trace!(key, "Cache hit");
            return Ok(value);
        }

        debug!(key, "Cache miss");
        let value = fetcher().await?;
        self.set(key, value.clone(), ttl).await;
        Ok(value)
    }
}

impl<V: Serialize> TtlCache<V> {
    /// Diagnostic snapshot: counts, sizes and per-entry ages
    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        let mut stats = CacheStats {
            entries: entries.len(),
            ..CacheStats::default()
        };

        for entry in entries.values() {
            let expired = entry.is_expired();
            let size_bytes = serde_json::to_vec(&entry.value).map_or(0, |v| v.len());
            if expired {
                stats.expired += 1;
            }
            stats.total_size_bytes += size_bytes;
            stats.items.push(EntryStats {
                key: entry.key.clone(),
                created_at: entry.created_at_utc,
                age_ms: entry.age().as_millis() as u64,
                ttl_ms: entry.ttl.as_millis() as u64,
                expired,
                size_bytes,
            });
        }

        stats.items.sort_by(|a, b| a.key.cmp(&b.key));
        stats
    }
}
