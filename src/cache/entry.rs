//! Cache Entry Module
//!
//! Defines the per-item metadata kept in the cache index.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Metadata for a single cached item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    /// Monotonic time of the last insertion or refresh
    pub inserted_at: Instant,
    /// Position of the item in the recency order
    pub seq: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped at `inserted_at`.
    pub fn new(inserted_at: Instant, seq: u64) -> Self {
        Self { inserted_at, seq }
    }

    // == Age ==
    /// Returns how long ago the entry was stamped, saturating at zero.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `max_age` as of `now`.
    ///
    /// Boundary condition: an entry whose age equals `max_age` exactly is still
    /// live; it expires only once its age is strictly greater.
    pub fn is_expired(&self, now: Instant, max_age: Duration) -> bool {
        self.age(now) > max_age
    }
}
