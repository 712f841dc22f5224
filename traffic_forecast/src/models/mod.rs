//! Forecasting models for traffic sample windows

use crate::config::ForecastConfig;
use crate::data::Prediction;
use chrono::{DateTime, Utc};
use rand::RngCore;
use std::fmt::Debug;
use tracing::{debug, warn};
use traffic_feed::{is_time_ordered, Sample};
use traffic_math::{recent, trend_slope};

/// Forecaster that projects a window of samples into future predictions
///
/// Implementations are stateless: all randomness comes through `rng`, so a
/// seeded generator makes the output reproducible.
pub trait TrafficForecaster: Debug + Send + Sync {
    /// Forecast `horizon` steps past the last sample of `window`
    ///
    /// Returns an empty vector when the window has fewer than two samples or
    /// the horizon is zero.
    fn forecast(
        &self,
        window: &[Sample],
        location_id: &str,
        horizon: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Prediction>;

    /// Settings the forecaster was built with
    fn config(&self) -> &ForecastConfig;

    /// Name of the model
    fn name(&self) -> &str;

    /// Forecast using the thread-local random source
    fn generate_predictions(
        &self,
        window: &[Sample],
        location_id: &str,
        horizon: usize,
    ) -> Vec<Prediction> {
        self.forecast(window, location_id, horizon, &mut rand::thread_rng())
    }
}

/// Trend and anchor point extracted from a sample window
#[derive(Debug, Clone, Copy)]
pub(crate) struct WindowTrend<'a> {
    /// Most recent sample
    pub last: &'a Sample,
    /// Congestion change per sample interval
    pub congestion: f64,
    /// Speed change per sample interval
    pub speed: f64,
}

impl<'a> WindowTrend<'a> {
    /// Fit trends over the trailing `config.trend_window` samples
    ///
    /// `None` means there is nothing to forecast.
    pub fn from_window(
        window: &'a [Sample],
        horizon: usize,
        config: &ForecastConfig,
        model: &str,
    ) -> Option<Self> {
        if horizon == 0 {
            debug!(model, "zero horizon requested");
            return None;
        }

        let last = match window {
            [.., _, last] => last,
            _ => {
                debug!(
                    model,
                    samples = window.len(),
                    "insufficient data for predictions"
                );
                return None;
            }
        };

        if !is_time_ordered(window) {
            warn!(model, "sample window is not ordered by time, using positional order");
        }

        let tail = recent(window, config.trend_window);
        let congestion: Vec<f64> = tail.iter().map(|s| s.congestion_level).collect();
        let speed: Vec<f64> = tail.iter().map(|s| s.average_speed).collect();

        Some(Self {
            last,
            congestion: trend_slope(&congestion),
            speed: trend_slope(&speed),
        })
    }
}

/// Forecast instants for steps `1..=horizon` after `last`
pub(crate) fn step_timestamps(
    last: DateTime<Utc>,
    horizon: usize,
    config: &ForecastConfig,
) -> impl Iterator<Item = (usize, DateTime<Utc>)> {
    let step = config.step_duration();
    (1..=horizon).scan(last, move |current, i| {
        *current += step;
        Some((i, *current))
    })
}

pub mod contextual;
pub mod trend_extrapolation;

pub use contextual::ContextualForecaster;
pub use trend_extrapolation::TrendForecaster;
