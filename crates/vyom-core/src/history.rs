//! Fixed-capacity trailing history for the chart.

use std::collections::VecDeque;

use crate::models::HistoryPoint;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Most recent chart points, oldest evicted first.
#[derive(Debug, Clone)]
pub struct TrailingHistory {
    points: VecDeque<HistoryPoint>,
    capacity: usize,
}

impl TrailingHistory {
    /// Capacity is clamped to at least one point.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: HistoryPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<HistoryPoint> {
        self.points.iter().cloned().collect()
    }
}

impl Default for TrailingHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
