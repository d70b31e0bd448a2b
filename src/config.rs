//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::tasks::SweepSchedule;

// == Time Unit ==
/// Unit used to interpret every raw duration in a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    #[default]
    Milliseconds,
    Seconds,
    Minutes,
}

impl TimeUnit {
    /// Converts a raw count in this unit into a `Duration`.
    pub fn to_duration(self, amount: u64) -> Duration {
        match self {
            TimeUnit::Nanoseconds => Duration::from_nanos(amount),
            TimeUnit::Microseconds => Duration::from_micros(amount),
            TimeUnit::Milliseconds => Duration::from_millis(amount),
            TimeUnit::Seconds => Duration::from_secs(amount),
            TimeUnit::Minutes => Duration::from_secs(amount.saturating_mul(60)),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ns" | "nanos" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "micros" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "millis" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "secs" | "seconds" => Ok(TimeUnit::Seconds),
            "m" | "mins" | "minutes" => Ok(TimeUnit::Minutes),
            other => Err(format!("Unknown time unit: {}", other)),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Raw amounts are interpreted in `time_unit`, which is fixed once the config is built.
#[derive(Debug, Clone)]
pub struct Config {
    /// Age after which an item becomes eligible for sweeping
    pub max_age: u64,
    /// Delay before the first automatic sweep (0 disables sweeping)
    pub sweep_initial_delay: u64,
    /// Delay between automatic sweeps (0 disables sweeping)
    pub sweep_interval: u64,
    /// Unit for all of the above
    pub time_unit: TimeUnit,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_AGE` - Maximum item age (default: 60000)
    /// - `CACHE_SWEEP_DELAY` - Initial sweep delay (default: 500)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency (default: 1000)
    /// - `CACHE_TIME_UNIT` - One of `ns`, `us`, `ms`, `s`, `m` (default: `ms`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_age: env_or("CACHE_MAX_AGE", defaults.max_age),
            sweep_initial_delay: env_or("CACHE_SWEEP_DELAY", defaults.sweep_initial_delay),
            sweep_interval: env_or("CACHE_SWEEP_INTERVAL", defaults.sweep_interval),
            time_unit: env_or("CACHE_TIME_UNIT", defaults.time_unit),
        }
    }

    /// Maximum item age as a `Duration`.
    pub fn max_age(&self) -> Duration {
        self.time_unit.to_duration(self.max_age)
    }

    /// Background sweep schedule described by this config.
    pub fn sweep_schedule(&self) -> SweepSchedule {
        SweepSchedule::new(
            self.time_unit.to_duration(self.sweep_initial_delay),
            self.time_unit.to_duration(self.sweep_interval),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_age: 60_000,
            sweep_initial_delay: 500,
            sweep_interval: 1_000,
            time_unit: TimeUnit::Milliseconds,
        }
    }
}

fn env_or<V: FromStr>(key: &str, default: V) -> V {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
