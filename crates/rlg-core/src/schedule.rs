//! Turn queue
//!
//! A min-heap of pending turns keyed by `(time, sequence)`. The sequence is
//! assigned on insertion, so actors due at the same time act in the order
//! they were queued.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::monster::ActorId;

/// Ordering key of a queued turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TurnKey {
    pub time: u64,
    pub sequence: u64,
    pub actor: ActorId,
}

/// Pending turns, earliest first
#[derive(Debug, Clone, Default)]
pub struct TurnQueue {
    heap: BinaryHeap<Reverse<TurnKey>>,
    next_sequence: u64,
}

impl TurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a turn for `actor` at `time`, returning the key it was given
    pub fn push(&mut self, actor: ActorId, time: u64) -> TurnKey {
        let key = TurnKey {
            time,
            sequence: self.next_sequence,
            actor,
        };
        self.next_sequence += 1;
        self.heap.push(Reverse(key));
        key
    }

    /// Remove the earliest turn
    pub fn pop(&mut self) -> Option<TurnKey> {
        self.heap.pop().map(|Reverse(key)| key)
    }

    pub fn peek(&self) -> Option<&TurnKey> {
        self.heap.peek().map(|Reverse(key)| key)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earliest_time_first() {
        let mut queue = TurnQueue::new();
        queue.push(ActorId(1), 100);
        queue.push(ActorId(2), 50);
        queue.push(ActorId(3), 75);
        let order: Vec<u32> = std::iter::from_fn(|| queue.pop()).map(|k| k.actor.0).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_equal_time_in_insertion_order() {
        let mut queue = TurnQueue::new();
        let first = queue.push(ActorId(7), 0);
        let second = queue.push(ActorId(0), 0);
        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
        assert_eq!(queue.pop().map(|k| k.actor), Some(ActorId(7)));
        assert_eq!(queue.pop().map(|k| k.actor), Some(ActorId(0)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_sequence_keeps_growing() {
        let mut queue = TurnQueue::new();
        let a = queue.push(ActorId(1), 10);
        queue.pop();
        let b = queue.push(ActorId(1), 10);
        assert!(b.sequence > a.sequence);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.peek().map(|k| k.time), Some(10));
    }
}
