use std::collections::VecDeque;

/// First-in first-out queue holding at most a fixed number of elements
///
/// Pushing onto a full queue evicts the oldest element.
#[derive(Clone, Debug)]
pub struct BoundedFifo<T> {
    elements: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedFifo<T> {
    pub fn new(capacity: usize) -> BoundedFifo<T> {
        BoundedFifo {
            elements: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Add an element to the back, returning the element evicted from the front (if any)
    ///
    /// A queue with capacity zero evicts what was just pushed.
    pub fn push(&mut self, element: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(element);
        }
        let evicted = if self.elements.len() >= self.capacity {
            self.elements.pop_front()
        } else {
            None
        };
        self.elements.push_back(element);
        evicted
    }

    /// Remove the oldest element (`None` when empty)
    pub fn pop(&mut self) -> Option<T> {
        self.elements.pop_front()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Keep only the elements satisfying the predicate, preserving order
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.elements.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.elements.iter()
    }
}

impl<T: PartialEq> BoundedFifo<T> {
    pub fn contains(&self, element: &T) -> bool {
        self.elements.contains(element)
    }
}
