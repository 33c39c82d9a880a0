//! Minimum-priority queue used by the frontier searches.

use std::{cmp::Ordering, collections::BinaryHeap};

/// Binary-heap frontier that yields entries in ascending priority.
///
/// Entries sharing a priority are released in insertion order, so identical
/// inputs always produce identical expansion sequences.
#[derive(Debug)]
pub struct Frontier<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

impl<T> Frontier<T> {
    /// Creates an empty frontier.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Inserts an item with the provided priority.
    pub fn push(&mut self, item: T, priority: u32) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.heap.push(Entry {
            priority,
            sequence,
            item,
        });
    }

    /// Removes the entry with the smallest priority, oldest first on ties.
    pub fn pop(&mut self) -> Option<(T, u32)> {
        self.heap.pop().map(|entry| (entry.item, entry.priority))
    }

    /// Number of queued entries, including superseded ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Reports whether the frontier has been exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

impl<T> Default for Frontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Entry<T> {
    priority: u32,
    sequence: u64,
    item: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.sequence == other.sequence
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert so the smallest key surfaces first.
        (other.priority, other.sequence).cmp(&(self.priority, self.sequence))
    }
}
