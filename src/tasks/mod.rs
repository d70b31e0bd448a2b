//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache is alive.
//!
//! # Tasks
//! - Sweep: Removes expired cache items at configured intervals

mod sweep;

pub use sweep::{Janitor, SweepSchedule};
