use std::collections::VecDeque;

/// Fixed-capacity sequence ordered newest first.
///
/// Pushing into a full buffer evicts the oldest entry before the new one is
/// placed at the head, so `len() <= capacity()` holds after every operation.
#[derive(Debug, Clone)]
pub struct BoundedBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedBuffer<T> {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);

        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the head, returning the evicted tail entry if the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_back()
        } else {
            None
        };

        self.items.push_front(item);

        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> BoundedBuffer<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_exceeds_capacity() {
        let mut buffer = BoundedBuffer::new(4);

        for i in 0..100 {
            buffer.push(i);
            assert!(buffer.len() <= 4);
        }
    }

    #[test]
    fn test_keeps_last_entries_newest_first() {
        let mut buffer = BoundedBuffer::new(3);

        assert_eq!(buffer.push(1), None);
        assert_eq!(buffer.push(2), None);
        assert_eq!(buffer.push(3), None);
        assert_eq!(buffer.push(4), Some(1));

        assert_eq!(buffer.to_vec(), vec![4, 3, 2]);
        assert_eq!(buffer.iter().next(), Some(&4));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut buffer = BoundedBuffer::new(0);
        buffer.push("a");
        buffer.push("b");

        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.to_vec(), vec!["b"]);
    }
}
