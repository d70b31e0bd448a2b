//! Cache Module
//!
//! Provides a concurrent, time-bounded cache of unique items ordered by
//! most recent insertion.

mod entry;
mod item;
mod order;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

pub(crate) use order::RecencyOrder;

// Re-export public types
pub use entry::CacheEntry;
pub use item::CacheItem;
pub use stats::CacheStats;
pub use store::TimedCache;
