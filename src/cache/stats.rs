//! Cache Statistics Module
//!
//! Tracks how items enter and leave the cache.

use serde::Serialize;

// == Cache Stats ==
/// Lifetime counters for a cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Current number of items in the cache
    pub entries: usize,
    /// Items inserted that were not already present
    pub added: u64,
    /// Adds that refreshed an item already present
    pub refreshed: u64,
    /// Items removed explicitly
    pub removed: u64,
    /// Items handed out by `take`
    pub taken: u64,
    /// Items dropped because they outlived the max age
    pub expired: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Churn ==
    /// Number of items that have left the cache for any reason.
    pub fn departed(&self) -> u64 {
        self.removed + self.taken + self.expired
    }

    pub fn record_add(&mut self) {
        self.added += 1;
    }

    pub fn record_refresh(&mut self) {
        self.refreshed += 1;
    }

    pub fn record_remove(&mut self) {
        self.removed += 1;
    }

    pub fn record_take(&mut self) {
        self.taken += 1;
    }

    // == Record Expired ==
    /// Adds `count` to the expiry counter.
    pub fn record_expired(&mut self, count: usize) {
        self.expired += count as u64;
    }

    // == Update Entry Count ==
    /// Updates the entries count.
    pub fn set_entries(&mut self, count: usize) {
        self.entries = count;
    }
}
