//! Fixed-capacity signal window with oldest-first eviction.

use std::collections::VecDeque;

use crate::error::ConfigError;

/// Ordered buffer of the most recent observations.
///
/// Invariant: `len() <= capacity()` at all times. Pushing onto a full window
/// evicts the oldest value; shrinking the capacity evicts from the front
/// until the window fits. Growing never invents data.
#[derive(Debug, Clone)]
pub struct SignalWindow {
    values: VecDeque<f64>,
    capacity: usize,
}

impl SignalWindow {
    /// Create an empty window. A capacity of zero is a configuration error.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity(capacity));
        }
        Ok(Self {
            values: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a value at the end, returning the evicted oldest value when
    /// the window was already at capacity.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.values.push_back(value);
        if self.values.len() > self.capacity {
            self.values.pop_front()
        } else {
            None
        }
    }

    /// Change the capacity mid-run.
    ///
    /// Shrinking keeps the most recent `new_capacity` values; growing leaves
    /// the contents untouched until enough pushes fill the extra room.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), ConfigError> {
        if new_capacity == 0 {
            return Err(ConfigError::InvalidCapacity(new_capacity));
        }
        self.capacity = new_capacity;
        while self.values.len() > self.capacity {
            self.values.pop_front();
        }
        Ok(())
    }

    /// Read-only copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    /// Remove all values; the capacity is kept.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.values.len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_capacity() {
        assert_eq!(
            SignalWindow::new(0).unwrap_err(),
            ConfigError::InvalidCapacity(0)
        );
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let mut window = SignalWindow::new(3).unwrap();
        assert_eq!(window.push(1.0), None);
        assert_eq!(window.push(2.0), None);
        assert_eq!(window.push(3.0), None);
        assert_eq!(window.push(4.0), Some(1.0));
        assert_eq!(window.push(5.0), Some(2.0));
        assert_eq!(window.snapshot(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn keeps_last_capacity_values_after_overflow() {
        let mut window = SignalWindow::new(5).unwrap();
        for i in 0..12 {
            window.push(i as f64);
        }
        assert_eq!(window.len(), 5);
        assert_eq!(window.snapshot(), vec![7.0, 8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn resize_smaller_truncates_from_front() {
        let mut window = SignalWindow::new(5).unwrap();
        for i in 0..5 {
            window.push(i as f64);
        }
        window.resize(3).unwrap();
        assert_eq!(window.capacity(), 3);
        assert_eq!(window.snapshot(), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn resize_larger_invents_nothing() {
        let mut window = SignalWindow::new(2).unwrap();
        window.push(1.0);
        window.push(2.0);
        window.resize(10).unwrap();
        assert_eq!(window.len(), 2);
        assert!(!window.is_full());
        assert_eq!(window.snapshot(), vec![1.0, 2.0]);
    }

    #[test]
    fn resize_rejects_zero() {
        let mut window = SignalWindow::new(2).unwrap();
        assert!(window.resize(0).is_err());
        assert_eq!(window.capacity(), 2);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut window = SignalWindow::new(4).unwrap();
        window.push(1.0);
        window.push(2.0);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.capacity(), 4);
    }
}
