//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache items.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::{CacheItem, TimedCache};
use crate::error::{CacheError, Result};

// == Sweep Schedule ==
/// When the background sweep runs.
///
/// A zero initial delay or a zero interval disables automatic sweeping; the
/// owner then calls [`TimedCache::clean`] itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSchedule {
    pub initial_delay: Duration,
    pub interval: Duration,
}

impl SweepSchedule {
    pub fn new(initial_delay: Duration, interval: Duration) -> Self {
        Self {
            initial_delay,
            interval,
        }
    }

    /// Schedule with automatic sweeping turned off.
    pub fn manual() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn is_enabled(&self) -> bool {
        !self.initial_delay.is_zero() && !self.interval.is_zero()
    }
}

// == Janitor ==
/// Owns the background sweep task of one cache.
///
/// The task only holds a weak reference to the cache, so it ends on its own
/// once the cache is dropped. Dropping the janitor stops the task.
#[derive(Debug)]
pub struct Janitor {
    handle: Option<JoinHandle<()>>,
}

impl Janitor {
    /// Starts sweeping `cache` on the current tokio runtime.
    ///
    /// The first sweep runs after `initial_delay`, later ones `interval` after
    /// the previous one. A disabled schedule yields an idle janitor.
    ///
    /// # Errors
    /// Returns `CacheError::RuntimeUnavailable` if the schedule is enabled and
    /// no tokio runtime is running on this thread.
    ///
    /// # Example
    /// ```ignore
    /// let cache = Arc::new(TimedCache::new(Duration::from_secs(30)));
    /// let janitor = Janitor::spawn(&cache, SweepSchedule::new(delay, interval))?;
    /// // Later, during shutdown:
    /// janitor.stop();
    /// ```
    pub fn spawn<T: CacheItem>(
        cache: &Arc<TimedCache<T>>,
        schedule: SweepSchedule,
    ) -> Result<Self> {
        if !schedule.is_enabled() {
            debug!("Sweep schedule disabled, expired items are only removed by clean()");
            return Ok(Self::idle());
        }

        let runtime = Handle::try_current()
            .map_err(|e| CacheError::RuntimeUnavailable(e.to_string()))?;
        let handle = runtime.spawn(run_sweeps(Arc::downgrade(cache), schedule));
        Ok(Self {
            handle: Some(handle),
        })
    }

    /// A janitor with no task behind it.
    pub fn idle() -> Self {
        Self { handle: None }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Aborts the sweep task. Safe to call more than once.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Sweep task stopped");
        }
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_sweeps<T: CacheItem>(target: Weak<TimedCache<T>>, schedule: SweepSchedule) {
    info!(
        "Starting sweep task: first run in {:?}, then every {:?}",
        schedule.initial_delay, schedule.interval
    );

    tokio::time::sleep(schedule.initial_delay).await;

    let mut ticker = tokio::time::interval(schedule.interval);
    // Fixed delay between runs, no catch-up bursts
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let Some(cache) = target.upgrade() else {
            debug!("Cache dropped, sweep task exiting");
            return;
        };

        let removed = cache.sweep();
        if removed > 0 {
            info!("Sweep: removed {} expired items", removed);
        } else {
            debug!("Sweep: no expired items found");
        }
    }
}
