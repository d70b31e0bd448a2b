//! Recency Order Module
//!
//! Keeps cached items in insertion/refresh order.

use std::collections::BTreeMap;

// == Recency Order ==
/// Tracks the order in which items were last added.
///
/// Every push hands out a fresh, strictly increasing sequence number, so:
/// - First (smallest seq) = Least recently added
/// - Last (largest seq) = Most recently added (the tail)
///
/// Callers keep the seq of each item so it can be removed without a scan.
#[derive(Debug)]
pub struct RecencyOrder<T> {
    /// Items keyed by the sequence number of their last push
    slots: BTreeMap<u64, T>,
    /// Sequence number for the next push
    next_seq: u64,
}

impl<T> RecencyOrder<T> {
    // == Constructor ==
    /// Creates a new empty order.
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            next_seq: 0,
        }
    }

    // == Push Back ==
    /// Appends an item at the tail and returns its sequence number.
    pub fn push_back(&mut self, item: T) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert(seq, item);
        seq
    }

    // == Remove ==
    /// Removes the item stored under `seq`.
    pub fn remove(&mut self, seq: u64) -> Option<T> {
        self.slots.remove(&seq)
    }

    // == Back ==
    /// Returns the most recently added item without removing it.
    pub fn back(&self) -> Option<(u64, &T)> {
        self.slots.last_key_value().map(|(seq, item)| (*seq, item))
    }

    // == Pop Back ==
    /// Removes and returns the most recently added item.
    pub fn pop_back(&mut self) -> Option<T> {
        self.slots.pop_last().map(|(_, item)| item)
    }

    /// Iterates from least to most recently added.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &T)> + '_ {
        self.slots.iter().map(|(seq, item)| (*seq, item))
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
