//! # Traffic Feed
//!
//! `traffic_feed` supplies the observed side of the traffic forecasting
//! workspace: timestamped [`Sample`]s for a fixed set of monitored locations.
//!
//! - **Sample sources**: the [`SampleSource`] trait and a [`MockSampleSource`]
//!   that synthesizes readings around per-location baselines
//! - **Live windows**: a bounded [`LiveWindow`] that keeps the most recent
//!   readings in arrival order
//! - **Locations**: the catalog of monitored road segments
//! - **Loading**: CSV import of recorded samples
//!
//! ## Usage Example
//!
//! ```no_run
//! use traffic_feed::{LiveWindow, MockSampleSource, SampleSource};
//!
//! let mut source = MockSampleSource::seeded(7);
//! let mut window = LiveWindow::default();
//!
//! window.extend(source.historical_samples("city-center")?);
//! window.push(source.current_sample("city-center")?);
//!
//! println!("{} samples in window", window.len());
//! # Ok::<(), traffic_feed::FeedError>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod locations;
pub mod source;
pub mod utils;
pub mod window;

pub use locations::{location, locations, Location};
pub use source::{Clock, MockSampleSource, SampleSource};
pub use window::LiveWindow;

/// Number of samples kept in a live window, and produced by a historical query
pub const HISTORICAL_DATA_POINTS: usize = 12;

/// Errors that can occur while producing or loading samples
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("No data: {0}")]
    NoData(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// One observed traffic measurement for a location at an instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Time of the observation
    pub timestamp: DateTime<Utc>,
    /// Opaque location identifier
    pub location_id: String,
    /// Average speed, unit-agnostic (mph in the dashboard)
    pub average_speed: f64,
    /// Vehicles counted during the interval
    pub total_vehicles: u32,
    /// Percentage saturation, nominally 0-100
    pub congestion_level: f64,
}

impl Sample {
    /// Create a new sample
    pub fn new(
        timestamp: DateTime<Utc>,
        location_id: impl Into<String>,
        average_speed: f64,
        total_vehicles: u32,
        congestion_level: f64,
    ) -> Self {
        Self {
            timestamp,
            location_id: location_id.into(),
            average_speed,
            total_vehicles,
            congestion_level,
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}: {:.1}% congestion, {:.1} mph, {} vehicles",
            self.location_id,
            self.timestamp.to_rfc3339(),
            self.congestion_level,
            self.average_speed,
            self.total_vehicles
        )
    }
}

/// Whether `samples` are ordered oldest to newest (ties allowed)
pub fn is_time_ordered(samples: &[Sample]) -> bool {
    samples
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp)
}
