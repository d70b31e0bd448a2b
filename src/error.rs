//! Error types for the timed cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the timed cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Item is the nil value for its type and cannot be cached
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// A bounded `take` gave up before an item became available
    #[error("Timed out after {0:?} waiting for an item")]
    Timeout(Duration),

    /// Automatic sweeping was requested outside of a tokio runtime
    #[error("Runtime unavailable: {0}")]
    RuntimeUnavailable(String),
}

// == Result Type Alias ==
/// Convenience Result type for the timed cache.
pub type Result<T> = std::result::Result<T, CacheError>;
