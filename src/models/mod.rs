//! Data Models
//!
//! Serializable views of cache state.

mod report;

pub use report::CacheReport;
