//! # Traffic Pulse
//!
//! `traffic_pulse` bundles the traffic forecasting workspace behind one
//! dependency:
//!
//! - [`feed`]: samples, sample sources, live windows and the location catalog
//! - [`forecast`]: forecasters, reliability scoring, history and monitoring
//! - [`math`]: trend fitting and bounded arithmetic
//!
//! ## Example
//!
//! ```
//! use traffic_pulse::prelude::*;
//!
//! let mut source = MockSampleSource::seeded(1);
//! let window = source.historical_samples("south-bridge")?;
//!
//! let model = ContextualForecaster::default();
//! let predictions = model.generate_predictions(&window, "south-bridge", 4);
//!
//! assert_eq!(predictions.len(), 4);
//! assert!(predictions.iter().all(|p| (0.0..=100.0).contains(&p.predicted_congestion)));
//! # Ok::<(), traffic_pulse::feed::FeedError>(())
//! ```

pub use traffic_feed as feed;
pub use traffic_forecast as forecast;
pub use traffic_math as math;

/// The types most callers need
pub mod prelude {
    pub use traffic_feed::{Clock, LiveWindow, MockSampleSource, Sample, SampleSource};
    pub use traffic_forecast::{
        calculate_reliability, evaluate_reliability, ContextualForecaster, ForecastConfig,
        MonitorOptions, Prediction, PredictionHistory, PredictionRun, ReliabilityScore,
        TrafficForecaster, TrafficMonitor, TrendForecaster,
    };
}

/// Version of the facade crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prelude_covers_a_session() {
        let mut monitor = TrafficMonitor::seeded(
            MockSampleSource::seeded(2),
            TrendForecaster::default(),
            MonitorOptions::default(),
            2,
        );

        let predictions = monitor.bootstrap().unwrap();
        assert_eq!(predictions.len(), ForecastConfig::default().default_horizon);
        assert_eq!(monitor.history().len(), 1);
    }
}
