//! Caller-held record of issued predictions
//!
//! The forecasters keep no state between calls. Anything that wants to score
//! a run once its horizon has passed stores it here and later lines it up
//! with the samples that actually arrived.

use crate::data::Prediction;
use crate::metrics::{evaluate_reliability, ReliabilityReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::debug;
use traffic_feed::Sample;

/// Runs kept by a default history
pub const DEFAULT_HISTORY_CAPACITY: usize = 8;

/// One prediction sequence issued for a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRun {
    pub location_id: String,
    /// Timestamp of the last sample the run was forecast from
    pub issued_at: DateTime<Utc>,
    pub predictions: Vec<Prediction>,
}

impl PredictionRun {
    pub fn new(
        location_id: impl Into<String>,
        issued_at: DateTime<Utc>,
        predictions: Vec<Prediction>,
    ) -> Self {
        Self {
            location_id: location_id.into(),
            issued_at,
            predictions,
        }
    }

    /// Realized samples for this run's prediction steps, see [`align_actuals`]
    pub fn actuals(&self, samples: &[Sample]) -> Vec<Sample> {
        align_actuals(&self.predictions, samples, self.issued_at)
    }

    /// Whether every prediction step has a realized sample
    pub fn is_complete(&self, samples: &[Sample]) -> bool {
        self.actuals(samples).len() == self.predictions.len()
    }

    /// Score the realized part of this run
    pub fn evaluate(&self, samples: &[Sample]) -> Option<ReliabilityReport> {
        let actuals = self.actuals(samples);
        evaluate_reliability(&self.predictions, &actuals)
    }
}

/// Pick one realized sample per prediction, in prediction order
///
/// Prediction `i` takes the last sample in `(t[i-1], t[i]]`, where `t[-1]` is
/// `issued_at`. Alignment stops at the first step whose interval is still
/// open (no sample at or after its timestamp yet) or holds no sample, so the
/// result always pairs positionally with a prefix of `predictions`.
/// `samples` must be ordered by time.
pub fn align_actuals(
    predictions: &[Prediction],
    samples: &[Sample],
    issued_at: DateTime<Utc>,
) -> Vec<Sample> {
    let Some(latest) = samples.last().map(|s| s.timestamp) else {
        return Vec::new();
    };

    let mut aligned = Vec::with_capacity(predictions.len());
    let mut lower = issued_at;

    for prediction in predictions {
        if latest < prediction.timestamp {
            break;
        }

        let realized = samples
            .iter()
            .rev()
            .find(|s| s.timestamp > lower && s.timestamp <= prediction.timestamp);

        match realized {
            Some(sample) => aligned.push(sample.clone()),
            None => break,
        }
        lower = prediction.timestamp;
    }

    aligned
}

/// Bounded history of prediction runs, oldest evicted first
#[derive(Debug, Clone)]
pub struct PredictionHistory {
    capacity: usize,
    runs: VecDeque<PredictionRun>,
}

impl PredictionHistory {
    /// History holding at most `capacity` runs (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            runs: VecDeque::with_capacity(capacity),
        }
    }

    /// Store a run, evicting the oldest one when full
    pub fn record(&mut self, run: PredictionRun) {
        if self.runs.len() == self.capacity {
            if let Some(evicted) = self.runs.pop_front() {
                debug!(
                    location_id = %evicted.location_id,
                    issued_at = %evicted.issued_at,
                    "evicted prediction run"
                );
            }
        }
        self.runs.push_back(run);
    }

    /// Most recent run for `location_id`
    pub fn latest(&self, location_id: &str) -> Option<&PredictionRun> {
        self.runs.iter().rev().find(|run| run.location_id == location_id)
    }

    /// Most recent run for `location_id` whose every step has been realized
    pub fn latest_complete(&self, location_id: &str, samples: &[Sample]) -> Option<&PredictionRun> {
        self.runs
            .iter()
            .rev()
            .filter(|run| run.location_id == location_id)
            .find(|run| !run.predictions.is_empty() && run.is_complete(samples))
    }

    /// Runs oldest first
    pub fn iter(&self) -> impl Iterator<Item = &PredictionRun> {
        self.runs.iter()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }
}

impl Default for PredictionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
