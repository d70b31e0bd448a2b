//! Cache Store Module
//!
//! Main cache engine pairing a uniqueness/expiry index with a recency order,
//! plus the blocking-wait protocol used by `take`.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::{Condvar, Mutex, RwLock};
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::{CacheEntry, CacheItem, CacheStats, RecencyOrder};
use crate::error::{CacheError, Result};

// == Shared State ==
/// Structures guarded by the cache lock. The index and order always hold the
/// same set of items; each index entry records the seq of its order slot.
#[derive(Debug)]
struct Inner<T> {
    index: HashMap<T, CacheEntry>,
    order: RecencyOrder<T>,
    stats: CacheStats,
}

impl<T: CacheItem> Inner<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            order: RecencyOrder::new(),
            stats: CacheStats::new(),
        }
    }

    fn tail_is_expired(&self, now: Instant, max_age: Duration) -> bool {
        self.order
            .back()
            .and_then(|(_, item)| self.index.get(item))
            .is_some_and(|entry| entry.is_expired(now, max_age))
    }

    /// Drops everything as expired. Only valid once the tail itself is expired.
    fn expire_all(&mut self) -> usize {
        let count = self.index.len();
        self.index.clear();
        self.order.clear();
        self.stats.record_expired(count);
        count
    }
}

// == Timed Cache ==
/// Thread-safe cache of unique items, ordered by most recent insertion and
/// bounded by a maximum age.
///
/// All operations take `&self`; share the cache between threads with an `Arc`.
#[derive(Debug)]
pub struct TimedCache<T> {
    inner: RwLock<Inner<T>>,
    /// Serializes the empty check of a blocking waiter with the wake-up in `add`
    waiters: Mutex<()>,
    available: Condvar,
    /// Wakes async waiters
    notify: Notify,
    max_age: Duration,
}

impl<T: CacheItem> TimedCache<T> {
    // == Constructor ==
    /// Creates an empty cache whose items expire once older than `max_age`.
    pub fn new(max_age: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner::new()),
            waiters: Mutex::new(()),
            available: Condvar::new(),
            notify: Notify::new(),
            max_age,
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    // == Add ==
    /// Adds an item at the most recent position.
    ///
    /// Items are unique: adding one that is already cached refreshes its
    /// timestamp and moves it to the tail instead of duplicating it. Both
    /// cases report `true`. If the cache was empty, waiting takers are woken.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidItem` for a nil item.
    pub fn add(&self, item: T) -> Result<bool> {
        if item.is_nil() {
            return Err(CacheError::InvalidItem(
                "nil item cannot be cached".to_string(),
            ));
        }

        let was_empty = {
            let mut guard = self.inner.write();
            let inner = &mut *guard;
            let was_empty = inner.index.is_empty();
            // Stamped under the lock so timestamps follow the recency order
            let now = Instant::now();

            if let Some(old) = inner.index.get(&item).copied() {
                inner.order.remove(old.seq);
                let seq = inner.order.push_back(item.clone());
                inner.index.insert(item, CacheEntry::new(now, seq));
                inner.stats.record_refresh();
            } else {
                let seq = inner.order.push_back(item.clone());
                inner.index.insert(item, CacheEntry::new(now, seq));
                inner.stats.record_add();
            }
            was_empty
        };

        if was_empty {
            self.wake_waiters();
        }
        Ok(true)
    }

    // == Remove ==
    /// Removes an item. Returns false if it was not cached.
    pub fn remove(&self, item: &T) -> bool {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        match inner.index.remove(item) {
            Some(entry) => {
                inner.order.remove(entry.seq);
                inner.stats.record_remove();
                true
            }
            None => false,
        }
    }

    // == Peek ==
    /// Returns the most recently added item without removing it.
    ///
    /// Returns `None` if the cache is empty or the most recent item has
    /// already expired. Nothing is swept here.
    pub fn peek(&self) -> Option<T> {
        let inner = self.inner.read();
        let (_, item) = inner.order.back()?;
        let entry = inner.index.get(item)?;
        if entry.is_expired(Instant::now(), self.max_age) {
            None
        } else {
            Some(item.clone())
        }
    }

    // == Try Take ==
    /// Removes and returns the most recently added item without waiting.
    ///
    /// If the tail has expired then every item has, and the whole contents
    /// are discarded as expired.
    pub fn try_take(&self) -> Option<T> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        if inner.tail_is_expired(Instant::now(), self.max_age) {
            let count = inner.expire_all();
            debug!("take found only expired items, discarded {}", count);
            return None;
        }

        let item = inner.order.pop_back()?;
        inner.index.remove(&item);
        inner.stats.record_take();
        Some(item)
    }

    // == Take ==
    /// Removes and returns the most recently added item, blocking the calling
    /// thread until one is available.
    pub fn take(&self) -> T {
        loop {
            if let Some(item) = self.try_take() {
                return item;
            }

            let mut guard = self.waiters.lock();
            while self.is_empty() {
                self.available.wait(&mut guard);
            }
        }
    }

    // == Take With Timeout ==
    /// Like [`take`](Self::take) but gives up after `timeout`.
    ///
    /// # Errors
    /// Returns `CacheError::Timeout` if no item became available in time.
    /// No live item is removed from the cache in that case.
    pub fn take_timeout(&self, timeout: Duration) -> Result<T> {
        // A deadline past the clock's range means no deadline at all
        let Some(deadline) = std::time::Instant::now().checked_add(timeout) else {
            return Ok(self.take());
        };

        loop {
            if let Some(item) = self.try_take() {
                return Ok(item);
            }

            let mut guard = self.waiters.lock();
            while self.is_empty() {
                let timed_out = self.available.wait_until(&mut guard, deadline).timed_out();
                if timed_out && self.is_empty() {
                    return Err(CacheError::Timeout(timeout));
                }
            }
        }
    }

    // == Take Async ==
    /// Async counterpart of [`take`](Self::take).
    ///
    /// Cancel safe: dropping the future before it resolves never removes an item.
    pub async fn take_async(&self) -> T {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so an add in between is not missed
            notified.as_mut().enable();

            if let Some(item) = self.try_take() {
                return item;
            }
            notified.await;
        }
    }

    fn wake_waiters(&self) {
        {
            let _guard = self.waiters.lock();
            self.available.notify_all();
        }
        self.notify.notify_waiters();
    }

    // == Sweep ==
    /// Removes every item older than the max age and returns how many were removed.
    ///
    /// Candidates are collected under the shared lock; the exclusive lock is
    /// held only to remove them, re-checking each against its current
    /// timestamp so items refreshed in between survive.
    pub fn sweep(&self) -> usize {
        if self.is_empty() {
            return 0;
        }

        let candidates = self.expired_candidates();
        if candidates.is_empty() {
            return 0;
        }
        self.remove_expired(candidates)
    }

    // == Clean ==
    /// Runs a sweep immediately on the calling thread.
    pub fn clean(&self) -> usize {
        let removed = self.sweep();
        if removed > 0 {
            info!("Manual clean: removed {} expired items", removed);
        }
        removed
    }

    pub(crate) fn expired_candidates(&self) -> Vec<T> {
        let inner = self.inner.read();
        let now = Instant::now();
        inner
            .index
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, self.max_age))
            .map(|(item, _)| item.clone())
            .collect()
    }

    pub(crate) fn remove_expired(&self, candidates: Vec<T>) -> usize {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let now = Instant::now();
        let mut removed = 0;

        for item in candidates {
            let still_expired = inner
                .index
                .get(&item)
                .is_some_and(|entry| entry.is_expired(now, self.max_age));
            if !still_expired {
                continue;
            }
            if let Some(entry) = inner.index.remove(&item) {
                inner.order.remove(entry.seq);
                removed += 1;
            }
        }

        inner.stats.record_expired(removed);
        removed
    }

    // == Accessors ==
    /// Returns the number of cached items, including any not yet swept.
    pub fn len(&self) -> usize {
        self.inner.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().index.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.inner.read().index.contains_key(item)
    }

    /// Returns the cached items from least to most recently added.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner
            .read()
            .order
            .iter()
            .map(|(_, item)| item.clone())
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        let mut stats = inner.stats.clone();
        stats.set_entries(inner.index.len());
        stats
    }

    // == Consistency Check ==
    /// Verifies that the index and the order describe the same items, with no
    /// duplicates, and that timestamps never decrease towards the tail.
    pub fn is_consistent(&self) -> bool {
        let inner = self.inner.read();
        if inner.order.is_empty() {
            return inner.index.is_empty();
        }
        if inner.index.len() != inner.order.len() {
            return false;
        }

        let mut last_stamp: Option<Instant> = None;
        for (seq, item) in inner.order.iter() {
            let Some(entry) = inner.index.get(item) else {
                return false;
            };
            if entry.seq != seq {
                return false;
            }
            if last_stamp.is_some_and(|stamp| entry.inserted_at < stamp) {
                return false;
            }
            last_stamp = Some(entry.inserted_at);
        }
        true
    }
}
