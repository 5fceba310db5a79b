//! Index-tracked binary min-heap with decrease-key support.

use std::{collections::HashMap, hash::Hash};

/// Minimum-priority queue over distinct elements.
///
/// Every queued element remembers its slot in the heap, so a priority change
/// re-heapifies in `O(log n)` instead of scanning the whole queue.
#[derive(Clone, Debug)]
pub struct PriorityQueue<T, P> {
    heap: Vec<Entry<T, P>>,
    slots: HashMap<T, usize>,
}

#[derive(Clone, Copy, Debug)]
struct Entry<T, P> {
    element: T,
    priority: P,
}

impl<T, P> PriorityQueue<T, P>
where
    T: Copy + Eq + Hash,
    P: Copy + PartialOrd,
{
    /// Builds a queue from the initial elements, reading each priority once.
    ///
    /// Duplicate elements keep the first occurrence.
    pub fn new<I, F>(initial: I, mut priority: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&T) -> P,
    {
        let mut queue = Self {
            heap: Vec::new(),
            slots: HashMap::new(),
        };

        for element in initial {
            if queue.slots.contains_key(&element) {
                continue;
            }
            let _ = queue.slots.insert(element, queue.heap.len());
            queue.heap.push(Entry {
                priority: priority(&element),
                element,
            });
        }

        for index in (0..queue.heap.len() / 2).rev() {
            queue.sift_down(index);
        }

        queue
    }

    /// Number of queued elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Reports whether the queue holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Reports whether the element is currently queued.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.slots.contains_key(element)
    }

    /// Priority currently recorded for a queued element.
    #[must_use]
    pub fn priority(&self, element: &T) -> Option<P> {
        self.slots.get(element).map(|&slot| self.heap[slot].priority)
    }

    /// Queues a new element. An element already queued has its priority replaced instead.
    ///
    /// Returns `true` when the element was not queued before.
    pub fn insert(&mut self, element: T, priority: P) -> bool {
        if self.notify_priority_changed(element, priority) {
            return false;
        }

        let slot = self.heap.len();
        let _ = self.slots.insert(element, slot);
        self.heap.push(Entry { element, priority });
        self.sift_up(slot);
        true
    }

    /// Element with the smallest priority, without removing it.
    #[must_use]
    pub fn peek(&self) -> Option<(T, P)> {
        self.heap
            .first()
            .map(|entry| (entry.element, entry.priority))
    }

    /// Removes and returns the element with the smallest priority.
    ///
    /// Ties are broken by heap layout.
    pub fn extract_min(&mut self) -> Option<(T, P)> {
        if self.heap.is_empty() {
            return None;
        }

        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        let _ = self.slots.remove(&entry.element);

        if !self.heap.is_empty() {
            self.sift_down(0);
        }

        Some((entry.element, entry.priority))
    }

    /// Records a new priority for a queued element and restores heap order.
    ///
    /// Returns `false` when the element is not queued, leaving the queue untouched.
    pub fn notify_priority_changed(&mut self, element: T, priority: P) -> bool {
        let Some(&slot) = self.slots.get(&element) else {
            return false;
        };

        let previous = self.heap[slot].priority;
        self.heap[slot].priority = priority;
        if priority < previous {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
        true
    }

    fn sift_up(&mut self, mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.less(slot, parent) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, mut slot: usize) {
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut smallest = slot;

            if left < self.heap.len() && self.less(left, smallest) {
                smallest = left;
            }
            if right < self.heap.len() && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == slot {
                break;
            }

            self.swap(slot, smallest);
            slot = smallest;
        }
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.heap[a].priority < self.heap[b].priority
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        let _ = self.slots.insert(self.heap[a].element, a);
        let _ = self.slots.insert(self.heap[b].element, b);
    }
}
