use std::{cmp::Ordering, collections::BinaryHeap};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("pop from an empty queue")]
    Empty,
}

/// The objects that we store in the priority queue
#[derive(Debug, Clone, Copy)]
pub struct QueueEntry<R> {
    pub point: R,
    /// cost so far plus the estimate of the remaining cost
    pub priority: usize,
    /// cost so far at the time the entry was pushed
    pub cost: usize,
}

impl<R> Ord for QueueEntry<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse for BinaryHeap to be a min-heap, on equal priority prefer the
        // entry that got further (it has less left to go)
        self.priority
            .cmp(&other.priority)
            .reverse()
            .then_with(|| self.cost.cmp(&other.cost))
    }
}

impl<R> PartialOrd for QueueEntry<R> {
    fn partial_cmp(&self, other: &QueueEntry<R>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> PartialEq for QueueEntry<R> {
    fn eq(&self, other: &QueueEntry<R>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<R> Eq for QueueEntry<R> {}

/// Min-priority queue on top of a binary heap.
///
/// There is no decrease-key: improving an entry means pushing a fresh one and
/// letting the consumer ignore the outdated one when it comes out.
#[derive(Debug, Clone)]
pub struct PriorityQueue<R> {
    heap: BinaryHeap<QueueEntry<R>>,
}

impl<R> Default for PriorityQueue<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> PriorityQueue<R> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, entry: QueueEntry<R>) {
        self.heap.push(entry);
    }

    /// Remove and return the entry with the smallest priority.
    pub fn pop_min(&mut self) -> Result<QueueEntry<R>, QueueError> {
        self.heap.pop().ok_or(QueueError::Empty)
    }

    pub fn peek_priority(&self) -> Option<usize> {
        self.heap.peek().map(|entry| entry.priority)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn entry(point: &'static str, priority: usize, cost: usize) -> QueueEntry<&'static str> {
        QueueEntry {
            point,
            priority,
            cost,
        }
    }

    #[test]
    fn test_pops_lowest_priority_first() {
        let mut queue = PriorityQueue::new();
        for (point, priority) in [("a", 7), ("b", 2), ("c", 9), ("d", 4), ("e", 1)] {
            queue.push(entry(point, priority, 0));
        }
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.peek_priority(), Some(1));

        let order: Vec<&str> = std::iter::from_fn(|| queue.pop_min().ok())
            .map(|e| e.point)
            .collect();
        assert_eq!(order, vec!["e", "b", "d", "a", "c"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_empty_queue() {
        let mut queue: PriorityQueue<&str> = PriorityQueue::default();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.peek_priority(), None);
        assert_eq!(queue.pop_min().unwrap_err(), QueueError::Empty);

        queue.push(entry("a", 3, 1));
        queue.pop_min().unwrap();
        assert_eq!(queue.pop_min().unwrap_err(), QueueError::Empty);
    }

    #[test]
    fn test_ties_prefer_larger_cost() {
        let mut queue = PriorityQueue::with_capacity(3);
        queue.push(entry("shallow", 5, 1));
        queue.push(entry("deep", 5, 4));
        queue.push(entry("mid", 5, 2));

        assert_eq!(queue.pop_min().unwrap().point, "deep");
        assert_eq!(queue.pop_min().unwrap().point, "mid");
        assert_eq!(queue.pop_min().unwrap().point, "shallow");
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut queue = PriorityQueue::new();
        queue.push(entry("a", 6, 6));
        queue.push(entry("a", 4, 4));
        assert_eq!(queue.len(), 2);

        let first = queue.pop_min().unwrap();
        assert_eq!((first.point, first.cost), ("a", 4));
        let second = queue.pop_min().unwrap();
        assert_eq!((second.point, second.cost), ("a", 6));

        queue.push(entry("b", 1, 1));
        queue.clear();
        assert!(queue.is_empty());
    }
}
