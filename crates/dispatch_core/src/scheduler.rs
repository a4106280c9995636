//! Pending-order scheduler: a binary min-heap keyed by `priority_score`.
//!
//! The heap is kept as an explicit array so that [`OrderScheduler::remove_by_id`]
//! can cancel an arbitrary order and re-heapify from its slot, which
//! `std::collections::BinaryHeap` cannot do.

use crate::orders::{Order, OrderId};

#[derive(Debug, Clone, Default)]
pub struct OrderScheduler {
    heap: Vec<Order>,
}

impl OrderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, order: Order) {
        self.heap.push(order);
        self.sift_up(self.heap.len() - 1);
    }

    /// Remove and return the order with the lowest score.
    pub fn dequeue(&mut self) -> Option<Order> {
        if self.heap.is_empty() {
            return None;
        }
        let root = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(root)
    }

    pub fn peek(&self) -> Option<&Order> {
        self.heap.first()
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

    pub fn contains(&self, id: OrderId) -> bool {
        self.heap.iter().any(|order| order.id == id)
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.heap.iter().find(|order| order.id == id)
    }

    /// Remove a specific order (cancellation). The last element takes its slot
    /// and is sifted up or down as needed.
    pub fn remove_by_id(&mut self, id: OrderId) -> Option<Order> {
        let idx = self.heap.iter().position(|order| order.id == id)?;
        let removed = self.heap.swap_remove(idx);
        if idx < self.heap.len() {
            if idx > 0 && self.heap[parent(idx)].priority_score > self.heap[idx].priority_score {
                self.sift_up(idx);
            } else {
                self.sift_down(idx);
            }
        }
        Some(removed)
    }

    /// All pending orders in heap-array order, NOT sorted by priority.
    /// Use [`OrderScheduler::ranked`] for dispatch order.
    pub fn snapshot(&self) -> Vec<Order> {
        self.heap.clone()
    }

    /// All pending orders sorted by score, ties broken by id.
    pub fn ranked(&self) -> Vec<Order> {
        let mut orders = self.heap.clone();
        orders.sort_by(|a, b| {
            a.priority_score
                .total_cmp(&b.priority_score)
                .then_with(|| a.id.cmp(&b.id))
        });
        orders
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = parent(idx);
            if self.heap[parent].priority_score <= self.heap[idx].priority_score {
                break;
            }
            self.heap.swap(parent, idx);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * idx + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut smaller = left;
            if right < len && self.heap[right].priority_score < self.heap[left].priority_score {
                smaller = right;
            }
            if self.heap[idx].priority_score <= self.heap[smaller].priority_score {
                break;
            }
            self.heap.swap(idx, smaller);
            idx = smaller;
        }
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (1..self.heap.len())
            .all(|idx| self.heap[parent(idx)].priority_score <= self.heap[idx].priority_score)
    }
}

fn parent(idx: usize) -> usize {
    (idx - 1) / 2
}
