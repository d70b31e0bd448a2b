//! Property-Based Tests for Cache Module
//!
//! Drives the cache with random operation sequences and compares it against a
//! plain vector model of the recency order.

use proptest::prelude::*;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::cache::{CacheItem, TimedCache};

// == Test Configuration ==
/// Long enough that nothing expires while a case runs
const TEST_MAX_AGE: Duration = Duration::from_secs(3600);

// == Strategies ==
/// Generates addresses from a small pool so repeats are common
fn addr_strategy() -> impl Strategy<Value = Ipv4Addr> {
    (1u8..16).prop_map(|last| Ipv4Addr::new(10, 0, 0, last))
}

#[derive(Debug, Clone)]
enum CacheOp {
    Add(Ipv4Addr),
    Remove(Ipv4Addr),
    Peek,
    TryTake,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        3 => addr_strategy().prop_map(CacheOp::Add),
        1 => addr_strategy().prop_map(CacheOp::Remove),
        1 => Just(CacheOp::Peek),
        1 => Just(CacheOp::TryTake),
    ]
}

/// Reference model: oldest first, newest last
fn model_add(model: &mut Vec<Ipv4Addr>, item: Ipv4Addr) {
    model.retain(|existing| *existing != item);
    model.push(item);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Any sequence of operations leaves the cache matching the model, with
    // no duplicates and the index and order in agreement.
    #[test]
    fn prop_matches_recency_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let cache = TimedCache::new(TEST_MAX_AGE);
        let mut model: Vec<Ipv4Addr> = Vec::new();

        for op in ops {
            match op {
                CacheOp::Add(item) => {
                    prop_assert_eq!(cache.add(item), Ok(true));
                    model_add(&mut model, item);
                }
                CacheOp::Remove(item) => {
                    let expected = model.contains(&item);
                    model.retain(|existing| *existing != item);
                    prop_assert_eq!(cache.remove(&item), expected);
                }
                CacheOp::Peek => {
                    prop_assert_eq!(cache.peek(), model.last().copied());
                }
                CacheOp::TryTake => {
                    prop_assert_eq!(cache.try_take(), model.pop());
                }
            }
            prop_assert!(cache.is_consistent(), "index and order diverged");
        }

        prop_assert_eq!(cache.snapshot(), model.clone());
        prop_assert_eq!(cache.len(), model.len());
    }

    // Adding any sequence never yields more entries than distinct items.
    #[test]
    fn prop_uniqueness(items in prop::collection::vec(addr_strategy(), 1..100)) {
        let cache = TimedCache::new(TEST_MAX_AGE);
        for item in &items {
            cache.add(*item).unwrap();
        }

        let distinct: HashSet<_> = items.iter().copied().collect();
        prop_assert_eq!(cache.len(), distinct.len());

        let snapshot = cache.snapshot();
        let unique: HashSet<_> = snapshot.iter().copied().collect();
        prop_assert_eq!(unique.len(), snapshot.len(), "duplicate in order");
    }

    // The last item added is always the one peek and take return.
    #[test]
    fn prop_last_add_is_tail(
        items in prop::collection::vec(addr_strategy(), 1..50),
        last in addr_strategy()
    ) {
        let cache = TimedCache::new(TEST_MAX_AGE);
        for item in items {
            cache.add(item).unwrap();
        }
        cache.add(last).unwrap();

        prop_assert_eq!(cache.peek(), Some(last));
        prop_assert_eq!(cache.try_take(), Some(last));
        prop_assert!(!cache.contains(&last));
    }

    // Stats account for every item that entered or left the cache.
    #[test]
    fn prop_stats_balance(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let cache = TimedCache::new(TEST_MAX_AGE);
        for op in ops {
            match op {
                CacheOp::Add(item) => { let _ = cache.add(item); }
                CacheOp::Remove(item) => { cache.remove(&item); }
                CacheOp::Peek => { cache.peek(); }
                CacheOp::TryTake => { cache.try_take(); }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.added - stats.departed(), stats.entries as u64);
    }

    // Nil items are always rejected and never change the cache.
    #[test]
    fn prop_nil_rejected(items in prop::collection::vec(addr_strategy(), 0..20)) {
        let cache = TimedCache::new(TEST_MAX_AGE);
        for item in items {
            cache.add(item).unwrap();
        }
        let before = cache.snapshot();

        prop_assert!(Ipv4Addr::UNSPECIFIED.is_nil());
        prop_assert!(cache.add(Ipv4Addr::UNSPECIFIED).is_err());
        prop_assert_eq!(cache.snapshot(), before);
    }
}
