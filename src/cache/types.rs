//! Cache entry and statistics types

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// A stored value with its creation time and TTL
///
/// Entries are never mutated; storing under the same key replaces the
/// whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Logical key as supplied by the caller
    pub key: String,
    /// The cached value
    pub value: V,
    /// Monotonic creation time, used for expiry
    pub created_at: Instant,
    /// Wall-clock creation time, for diagnostics
    pub created_at_utc: DateTime<Utc>,
    /// Time-to-live
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Create an entry stamped with the current time
    pub fn new(key: impl Into<String>, value: V, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            value,
            created_at: Instant::now(),
            created_at_utc: Utc::now(),
            ttl,
        }
    }

    /// Time since the entry was stored
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Check if the entry has outlived its TTL
    pub fn is_expired(&self) -> bool {
        self.age() >= self.ttl
    }
}

/// Diagnostic snapshot of a cache
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of stored entries, expired ones included
    pub entries: usize,
    /// Entries past their TTL that have not been evicted yet
    pub expired: usize,
    /// Sum of the JSON-serialized size of every value
    pub total_size_bytes: usize,
    /// Per-entry details
    pub items: Vec<EntryStats>,
}

/// Diagnostic details for one entry
#[derive(Debug, Clone, Serialize)]
pub struct EntryStats {
    pub key: String,
    pub created_at: DateTime<Utc>,
    pub age_ms: u64,
    pub ttl_ms: u64,
    pub expired: bool,
    pub size_bytes: usize,
}
