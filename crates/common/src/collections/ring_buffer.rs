#![warn(missing_docs, rust_2018_idioms)]

//! A fixed-capacity circular buffer with evict-oldest-on-full semantics.
//!
//! A [`RingBuffer`] stores items in insertion order while keeping its length
//! bounded by the caller-provided capacity. When [`push`](RingBuffer::push)
//! receives a new value and the buffer is full, the oldest element (logical
//! index `0`) is evicted and handed back to the caller.
//!
//! # Complexity
//! - `push`, `pop`, `get`, `len`, `is_empty`, `is_full` and `capacity` are
//!   **O(1)**; `to_vec` is **O(n)**.
//!
//! # Thread Safety
//! - `RingBuffer<T>` uses no interior mutability. Shared use goes through an
//!   outer lock.

use std::collections::VecDeque;

/// A fixed-capacity buffer storing elements in first-in-first-out order.
///
/// # Examples
///
/// ```rust
/// use noteapp_common::collections::RingBuffer;
///
/// let mut buffer = RingBuffer::new(3);
/// buffer.push(1);
/// buffer.push(2);
/// buffer.push(3);
/// assert_eq!(buffer.push(4), Some(1));
///
/// assert_eq!(buffer.to_vec(), vec![2, 3, 4]);
/// assert_eq!(buffer.get(0), Some(&2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingBuffer<T> {
    buf: VecDeque<T>,
    capacity: usize,
}

impl<T> RingBuffer<T> {
    /// Creates a new buffer with the provided capacity.
    ///
    /// A capacity of zero is clamped to `1`.
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { buf: VecDeque::with_capacity(capacity), capacity }
    }

    /// Appends an item, returning the evicted oldest item when the buffer was
    /// already full.
    #[inline]
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() { self.buf.pop_front() } else { None };
        self.buf.push_back(item);
        evicted
    }

    /// Removes and returns the oldest item in the buffer.
    #[inline]
    #[must_use]
    pub fn pop(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    /// Returns the value at `idx`, counting from the oldest element.
    #[inline]
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.buf.get(idx)
    }

    /// Returns the number of items currently stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` when the buffer has no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns `true` when the buffer reached its capacity.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Returns the maximum number of items the buffer can hold.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all elements, leaving the capacity unchanged.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Returns an iterator visiting elements from oldest to newest.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buf.iter()
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copies the contents, oldest first, into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.buf.iter().cloned().collect()
    }
}

impl<T> Default for RingBuffer<T> {
    /// Creates a single-slot buffer.
    #[inline]
    fn default() -> Self {
        Self::new(1)
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::collections::vec_deque::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.buf.iter()
    }
}
