//! Sample sources
//!
//! A [`SampleSource`] is anything that can hand out a historical window and
//! a fresh reading for a location. [`MockSampleSource`] synthesizes readings
//! around the catalog baselines, which is what the dashboard runs on.

use crate::locations::{self, baseline};
use crate::{FeedError, Result, Sample, HISTORICAL_DATA_POINTS};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Producer of traffic samples for a location
pub trait SampleSource {
    /// Recent samples for `location_id`, oldest first
    fn historical_samples(&mut self, location_id: &str) -> Result<Vec<Sample>>;

    /// A single reading taken now
    fn current_sample(&mut self, location_id: &str) -> Result<Sample>;
}

/// Time source for generated samples
#[derive(Debug, Clone, PartialEq)]
pub enum Clock {
    /// Wall-clock time
    System,
    /// Simulated time that advances by `tick` on every current reading
    Manual {
        /// Current simulated instant
        now: DateTime<Utc>,
        /// Advance applied per reading
        tick: Duration,
    },
}

impl Clock {
    /// A manual clock starting at `start`
    pub fn manual(start: DateTime<Utc>, tick: Duration) -> Self {
        Clock::Manual { now: start, tick }
    }

    /// Current instant without advancing
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Manual { now, .. } => *now,
        }
    }

    /// Advance a manual clock by one tick and return the new instant
    pub fn advance(&mut self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Manual { now, tick } => {
                *now += *tick;
                *now
            }
        }
    }
}

/// Synthetic sample generator
///
/// Speeds vary ±5 and congestion ±10 around the location baseline; vehicle
/// counts fall in 200..700. Historical windows are spaced `interval` apart
/// and end one interval before the clock's current time.
#[derive(Debug, Clone)]
pub struct MockSampleSource {
    rng: StdRng,
    clock: Clock,
    interval: Duration,
    history_len: usize,
    strict: bool,
}

impl MockSampleSource {
    /// Generator seeded from OS entropy, using wall-clock time
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic generator, using wall-clock time
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            clock: Clock::System,
            interval: Duration::minutes(5),
            history_len: HISTORICAL_DATA_POINTS,
            strict: false,
        }
    }

    /// Use `clock` for timestamps
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Spacing between historical samples
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Number of samples returned by a historical query
    pub fn with_history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len;
        self
    }

    /// Reject ids that are not in the location catalog
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// The clock driving this source
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    fn check_location(&self, location_id: &str) -> Result<()> {
        if self.strict && locations::location(location_id).is_none() {
            return Err(FeedError::UnknownLocation(location_id.to_string()));
        }
        Ok(())
    }

    fn reading(&mut self, location_id: &str, timestamp: DateTime<Utc>) -> Sample {
        let (base_speed, base_congestion) = baseline(location_id);

        Sample {
            timestamp,
            location_id: location_id.to_string(),
            average_speed: base_speed + self.rng.gen::<f64>() * 10.0 - 5.0,
            total_vehicles: self.rng.gen_range(200..700),
            congestion_level: base_congestion + self.rng.gen::<f64>() * 20.0 - 10.0,
        }
    }
}

impl Default for MockSampleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for MockSampleSource {
    fn historical_samples(&mut self, location_id: &str) -> Result<Vec<Sample>> {
        self.check_location(location_id)?;

        let now = self.clock.now();
        let count = self.history_len;
        let samples: Vec<Sample> = (0..count)
            .map(|i| {
                let offset = self.interval * (count - i) as i32;
                self.reading(location_id, now - offset)
            })
            .collect();

        debug!(location_id, count, "generated historical samples");
        Ok(samples)
    }

    fn current_sample(&mut self, location_id: &str) -> Result<Sample> {
        self.check_location(location_id)?;

        let now = self.clock.advance();
        Ok(self.reading(location_id, now))
    }
}
