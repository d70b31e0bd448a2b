//! Cache Report DTO
//!
//! Serializable point-in-time view of a cache, logged by the daemon.

use std::fmt::Display;

use serde::Serialize;

use crate::cache::{CacheItem, CacheStats, TimedCache};

/// Snapshot of a cache's state and counters.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    /// When the report was taken, in ISO 8601 format
    pub generated_at: String,
    /// Configured max age in milliseconds
    pub max_age_ms: u64,
    /// Most recent live item, if any
    pub newest: Option<String>,
    /// Lifetime counters
    pub stats: CacheStats,
    /// Fraction of adds that refreshed an existing item
    pub refresh_rate: f64,
}

impl CacheReport {
    /// Builds a report from the current state of `cache`.
    pub fn from_cache<T: CacheItem + Display>(cache: &TimedCache<T>) -> Self {
        let stats = cache.stats();
        let total_adds = stats.added + stats.refreshed;
        let refresh_rate = if total_adds > 0 {
            stats.refreshed as f64 / total_adds as f64
        } else {
            0.0
        };

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            max_age_ms: u64::try_from(cache.max_age().as_millis()).unwrap_or(u64::MAX),
            newest: cache.peek().map(|item| item.to_string()),
            stats,
            refresh_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    #[test]
    fn test_report_empty_cache() {
        let cache: TimedCache<Ipv4Addr> = TimedCache::new(Duration::from_secs(2));
        let report = CacheReport::from_cache(&cache);

        assert_eq!(report.max_age_ms, 2000);
        assert!(report.newest.is_none());
        assert_eq!(report.refresh_rate, 0.0);
    }

    #[test]
    fn test_report_serialize() {
        let cache = TimedCache::new(Duration::from_secs(60));
        cache.add(Ipv4Addr::new(10, 0, 0, 1)).unwrap();
        cache.add(Ipv4Addr::new(10, 0, 0, 2)).unwrap();
        cache.add(Ipv4Addr::new(10, 0, 0, 1)).unwrap();
        cache.add(Ipv4Addr::new(10, 0, 0, 3)).unwrap();

        let report = CacheReport::from_cache(&cache);
        assert!((report.refresh_rate - 0.25).abs() < 0.001);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["newest"], "10.0.0.3");
        assert_eq!(json["stats"]["entries"], 3);
        assert_eq!(json["stats"]["refreshed"], 1);
        assert!(json["generated_at"].is_string());
    }
}
