//! TTL cache module
//!
//! A get-or-compute cache with per-entry time-to-live, used to memoize
//! derived lookups such as the project list behind numeric id resolution.
//!
//! # Expiration
//!
//! Expiration is pull-based: nothing sweeps entries in the background.
//! A stale entry is discovered and removed the next time its key is
//! touched by [`TtlCache::get`], [`TtlCache::get_cached`] or
//! [`TtlCache::has`]. Note that `has` is therefore not a pure predicate.
//! [`TtlCache::clear_expired`] is available for periodic housekeeping.

mod ttl;
mod types;

pub use ttl::{sanitize_key, TtlCache, DEFAULT_TTL};
pub use types::{CacheEntry, CacheStats, EntryStats};
