//! Timed Cache - A thread-safe, time-bounded cache of unique items
//!
//! Items are kept in most-recent-insertion order, expire after a configured
//! age, and can be consumed with a blocking `take`.

pub mod cache;
pub mod config;
pub mod error;
pub mod managed;
pub mod models;
pub mod tasks;

pub use cache::{CacheItem, TimedCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use managed::ManagedCache;
pub use tasks::{Janitor, SweepSchedule};
