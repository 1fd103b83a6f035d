// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred-task queue.
//!
//! Timers are the only asynchronous primitive in segue. Rather than handing
//! one host timer to every animated element, deferred work is queued on a
//! [`Timeline`] and the host keeps a single one-shot timer armed for
//! [`next_due`](Timeline::next_due). When it fires, the host drains every
//! task that has come due.
//!
//! Tasks due at the same time run in the order they were scheduled.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::{Ordering, Reverse};

use crate::time::HostTime;

#[derive(Debug)]
struct Entry<T> {
    at: HostTime,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
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
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

/// A min-queue of tasks keyed by due time.
#[derive(Debug)]
pub struct Timeline<T> {
    heap: BinaryHeap<Reverse<Entry<T>>>,
    next_seq: u64,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timeline<T> {
    /// Creates an empty timeline.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Queues `task` to run at `at`.
    pub fn schedule(&mut self, at: HostTime, task: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry { at, seq, task }));
    }

    /// Returns the due time of the earliest task.
    #[must_use]
    pub fn next_due(&self) -> Option<HostTime> {
        self.heap.peek().map(|Reverse(e)| e.at)
    }

    /// Removes and returns every task due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: HostTime) -> Vec<T> {
        let mut out = Vec::new();
        while let Some(Reverse(e)) = self.heap.peek() {
            if e.at > now {
                break;
            }
            if let Some(Reverse(e)) = self.heap.pop() {
                out.push(e.task);
            }
        }
        out
    }

    /// Returns the number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every queued task.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_due_order() {
        let mut t = Timeline::new();
        t.schedule(HostTime(30), "c");
        t.schedule(HostTime(10), "a");
        t.schedule(HostTime(20), "b");
        assert_eq!(t.next_due(), Some(HostTime(10)));
        assert_eq!(t.drain_due(HostTime(25)), ["a", "b"]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.drain_due(HostTime(29)), Vec::<&str>::new());
        assert_eq!(t.drain_due(HostTime(30)), ["c"]);
        assert!(t.is_empty());
        assert_eq!(t.next_due(), None);
    }

    #[test]
    fn ties_keep_schedule_order() {
        let mut t = Timeline::new();
        for label in ["first", "second", "third"] {
            t.schedule(HostTime(5), label);
        }
        assert_eq!(t.drain_due(HostTime(5)), ["first", "second", "third"]);
    }
}
