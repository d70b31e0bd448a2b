//! Cache Item Module
//!
//! The contract every cached value satisfies.

use std::hash::Hash;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

// == Cache Item ==
/// A value that can be stored in a [`TimedCache`](crate::cache::TimedCache).
///
/// The cache only relies on identity (`Eq` + `Hash`). `is_nil` marks the
/// value that stands for "nothing" in the item's domain; such values are
/// rejected by `add`.
pub trait CacheItem: Eq + Hash + Clone + Send + Sync + 'static {
    /// Returns true if this value carries no identity.
    fn is_nil(&self) -> bool {
        false
    }
}

impl CacheItem for IpAddr {
    fn is_nil(&self) -> bool {
        self.is_unspecified()
    }
}

impl CacheItem for Ipv4Addr {
    fn is_nil(&self) -> bool {
        self.is_unspecified()
    }
}

impl CacheItem for Ipv6Addr {
    fn is_nil(&self) -> bool {
        self.is_unspecified()
    }
}

impl CacheItem for SocketAddr {
    fn is_nil(&self) -> bool {
        self.ip().is_unspecified() && self.port() == 0
    }
}

impl CacheItem for String {
    fn is_nil(&self) -> bool {
        self.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unspecified_addresses_are_nil() {
        assert!(Ipv4Addr::UNSPECIFIED.is_nil());
        assert!(Ipv6Addr::UNSPECIFIED.is_nil());
        assert!(IpAddr::V4(Ipv4Addr::UNSPECIFIED).is_nil());
        assert!(!Ipv4Addr::new(0, 0, 0, 1).is_nil());
        assert!(!IpAddr::V6(Ipv6Addr::LOCALHOST).is_nil());
    }

    #[test]
    fn test_socket_addr_nil_needs_port_zero() {
        let nil: SocketAddr = "0.0.0.0:0".parse().unwrap();
        let listening: SocketAddr = "0.0.0.0:8080".parse().unwrap();
        assert!(nil.is_nil());
        assert!(!listening.is_nil());
    }

    #[test]
    fn test_empty_string_is_nil() {
        assert!(String::new().is_nil());
        assert!(!"peer".to_string().is_nil());
    }
}
