//! Rolling window of the most recent samples

use crate::{Sample, HISTORICAL_DATA_POINTS};
use std::collections::VecDeque;
use tracing::warn;

/// Bounded window of samples in arrival order
///
/// Pushing beyond capacity evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct LiveWindow {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl LiveWindow {
    /// Create a window holding at most `capacity` samples (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a sample, evicting the oldest when full
    pub fn push(&mut self, sample: Sample) {
        if let Some(last) = self.samples.back() {
            if sample.timestamp < last.timestamp {
                warn!(
                    location_id = %sample.location_id,
                    "sample at {} arrived after {}",
                    sample.timestamp,
                    last.timestamp
                );
            }
        }

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Append every sample in order
    pub fn extend<I: IntoIterator<Item = Sample>>(&mut self, samples: I) {
        for sample in samples {
            self.push(sample);
        }
    }

    /// Samples as a contiguous slice, oldest first
    pub fn as_slice(&mut self) -> &[Sample] {
        self.samples.make_contiguous()
    }

    /// Copy of the samples, oldest first
    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for LiveWindow {
    fn default() -> Self {
        Self::new(HISTORICAL_DATA_POINTS)
    }
}
