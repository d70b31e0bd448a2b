//! Managed Cache
//!
//! A cache bundled with the background task that sweeps it.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{CacheItem, TimedCache};
use crate::config::Config;
use crate::error::Result;
use crate::tasks::{Janitor, SweepSchedule};

/// A [`TimedCache`] together with its [`Janitor`].
///
/// Derefs to the cache. Dropping it (or calling [`shutdown`](Self::shutdown))
/// stops background sweeping; clones handed out by [`shared`](Self::shared)
/// keep working but are no longer swept automatically.
#[derive(Debug)]
pub struct ManagedCache<T> {
    cache: Arc<TimedCache<T>>,
    janitor: Janitor,
}

impl<T: CacheItem> ManagedCache<T> {
    /// Creates a cache and starts sweeping it according to `schedule`.
    ///
    /// # Errors
    /// Fails if `schedule` is enabled and no tokio runtime is running.
    pub fn new(max_age: Duration, schedule: SweepSchedule) -> Result<Self> {
        let cache = Arc::new(TimedCache::new(max_age));
        let janitor = Janitor::spawn(&cache, schedule)?;
        info!(
            "Cache created: max_age={:?}, sweeping={}",
            max_age,
            janitor.is_running()
        );
        Ok(Self { cache, janitor })
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.max_age(), config.sweep_schedule())
    }

    /// Returns a shared handle to the cache for use on other threads or tasks.
    pub fn shared(&self) -> Arc<TimedCache<T>> {
        Arc::clone(&self.cache)
    }

    pub fn is_sweeping(&self) -> bool {
        self.janitor.is_running()
    }

    /// Stops background sweeping and returns the cache.
    pub fn shutdown(mut self) -> Arc<TimedCache<T>> {
        self.janitor.stop();
        info!("Cache sweeping stopped");
        Arc::clone(&self.cache)
    }
}

impl<T> Deref for ManagedCache<T> {
    type Target = TimedCache<T>;

    fn deref(&self) -> &Self::Target {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeUnit;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_manual_mode_without_runtime() {
        let cache: ManagedCache<IpAddr> =
            ManagedCache::new(Duration::from_secs(1), SweepSchedule::manual()).unwrap();

        assert!(!cache.is_sweeping());
        cache.add(IpAddr::V4(Ipv4Addr::LOCALHOST)).unwrap();
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_from_config_sweeps() {
        let config = Config {
            max_age: 1,
            sweep_initial_delay: 1,
            sweep_interval: 1,
            time_unit: TimeUnit::Seconds,
        };
        let cache: ManagedCache<IpAddr> = ManagedCache::from_config(&config).unwrap();
        assert!(cache.is_sweeping());

        cache.add(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 1))).unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_sweeping() {
        let cache: ManagedCache<IpAddr> = ManagedCache::new(
            Duration::from_millis(100),
            SweepSchedule::new(Duration::from_millis(50), Duration::from_millis(50)),
        )
        .unwrap();
        let shared = cache.shared();

        let stopped = cache.shutdown();
        stopped.add(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 1))).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        // Nobody sweeps any more; the item stays until cleaned by hand
        assert_eq!(shared.len(), 1);
        assert_eq!(shared.clean(), 1);
    }
}
