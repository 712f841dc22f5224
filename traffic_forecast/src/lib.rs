//! # Traffic Forecast
//!
//! A Rust library for short-horizon road traffic forecasting and for scoring
//! past forecasts once the real readings arrive.
//!
//! ## Features
//!
//! - Contextual trend forecasting of congestion and speed, adjusted for time
//!   of day, weather, season and location
//! - The simpler damped trend forecaster with random jitter
//! - Reliability scoring of issued predictions against realized samples
//! - Caller-held prediction history and a monitoring loop that ties a sample
//!   source to a forecaster
//! - CSV export of flat prediction and sample records
//!
//! ## Determinism
//!
//! Forecasters never hold a random generator. Weather draws and jitter come
//! from the `rng` argument of [`TrafficForecaster::forecast`]:
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use traffic_forecast::{ContextualForecaster, TrafficForecaster};
//! use traffic_feed::{MockSampleSource, SampleSource};
//!
//! let mut source = MockSampleSource::seeded(3);
//! let window = source.historical_samples("city-center")?;
//! let model = ContextualForecaster::default();
//!
//! let first = model.forecast(&window, "city-center", 6, &mut StdRng::seed_from_u64(1));
//! let second = model.forecast(&window, "city-center", 6, &mut StdRng::seed_from_u64(1));
//! assert_eq!(first, second);
//! # Ok::<(), traffic_feed::FeedError>(())
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use traffic_forecast::{calculate_reliability, ContextualForecaster, TrafficForecaster};
//! use traffic_feed::{MockSampleSource, SampleSource};
//!
//! let mut source = MockSampleSource::seeded(7);
//! let window = source.historical_samples("north-highway")?;
//!
//! // Six 15-minute steps past the last sample
//! let model = ContextualForecaster::default();
//! let predictions = model.generate_predictions(&window, "north-highway", 6);
//! assert_eq!(predictions.len(), 6);
//!
//! // Later, once readings for those instants are in
//! let actuals = vec![source.current_sample("north-highway")?];
//! if let Some(score) = calculate_reliability(&predictions, &actuals) {
//!     println!("congestion accuracy {:.1}%", score.congestion_accuracy);
//! }
//! # Ok::<(), traffic_feed::FeedError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod factors;
pub mod history;
pub mod metrics;
pub mod models;
pub mod monitor;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{FactorWeights, ForecastConfig, WeatherMode};
pub use crate::data::{Prediction, PredictionFactors};
pub use crate::error::{ForecastError, Result};
pub use crate::factors::{FactorTables, WeatherCondition};
pub use crate::history::{align_actuals, PredictionHistory, PredictionRun};
pub use crate::metrics::{
    calculate_reliability, evaluate_reliability, ReliabilityReport, ReliabilityScore,
};
pub use crate::models::{ContextualForecaster, TrafficForecaster, TrendForecaster};
pub use crate::monitor::{MonitorOptions, TickOutcome, TrafficMonitor};
pub use crate::utils::{calculate_averages, CongestionStatus, TrafficAverages};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
