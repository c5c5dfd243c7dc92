//! Rolling chart data for the dashboard.

use std::collections::VecDeque;

use cdc_feed_shared::metrics::OperationCounts;

/// Three bounded series (create / update / delete) plus their labels.
///
/// All four sequences always have the same length, never above the capacity.
/// When full, the oldest point is evicted from every sequence before a new one
/// is appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    capacity: usize,
    labels: VecDeque<String>,
    create: VecDeque<u64>,
    update: VecDeque<u64>,
    delete: VecDeque<u64>,
}

impl ChartSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            labels: VecDeque::with_capacity(capacity),
            create: VecDeque::with_capacity(capacity),
            update: VecDeque::with_capacity(capacity),
            delete: VecDeque::with_capacity(capacity),
        }
    }

    /// Append one point
    pub fn push(&mut self, label: String, counts: &OperationCounts) {
        if self.capacity == 0 {
            return;
        }
        while self.labels.len() >= self.capacity {
            self.labels.pop_front();
            self.create.pop_front();
            self.update.pop_front();
            self.delete.pop_front();
        }
        self.labels.push_back(label);
        self.create.push_back(counts.create);
        self.update.push_back(counts.update);
        self.delete.push_back(counts.delete);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &VecDeque<String> {
        &self.labels
    }

    pub fn create(&self) -> &VecDeque<u64> {
        &self.create
    }

    pub fn update(&self) -> &VecDeque<u64> {
        &self.update
    }

    pub fn delete(&self) -> &VecDeque<u64> {
        &self.delete
    }

    /// Largest value across the three series (0 when empty)
    pub fn max_value(&self) -> u64 {
        self.create
            .iter()
            .chain(&self.update)
            .chain(&self.delete)
            .copied()
            .max()
            .unwrap_or(0)
    }
}
