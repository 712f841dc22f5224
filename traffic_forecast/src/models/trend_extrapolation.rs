//! Damped trend extrapolation
//!
//! The dashboard's first forecaster: the trend is scaled by the time-of-day
//! factor, a random jitter in [0.9, 1.1) and a time weight that loses 10% per
//! step. Speed moves against the time-of-day factor. There is no weather or
//! seasonal input.

use crate::config::ForecastConfig;
use crate::data::{Prediction, PredictionFactors};
use crate::error::Result;
use crate::factors::TimeOfDayProfile;
use crate::models::{step_timestamps, TrafficForecaster, WindowTrend};
use rand::{Rng, RngCore};
use tracing::{debug, trace};
use traffic_feed::Sample;
use traffic_math::{clamp_finite, floor_finite};

/// Weight lost per step after the first
const TIME_WEIGHT_DECAY: f64 = 0.1;

/// Half-open range of the per-step jitter
const JITTER_LOW: f64 = 0.9;
const JITTER_HIGH: f64 = 1.1;

/// Trend forecaster with random jitter and a decaying time weight
#[derive(Debug, Clone)]
pub struct TrendForecaster {
    name: String,
    config: ForecastConfig,
    time_of_day: TimeOfDayProfile,
}

impl TrendForecaster {
    pub fn new(config: ForecastConfig, time_of_day: TimeOfDayProfile) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: "Trend Extrapolation".to_string(),
            config,
            time_of_day,
        })
    }

    /// Weight applied to the trend at 1-based `step`
    pub fn time_weight(step: usize) -> f64 {
        (1.0 - TIME_WEIGHT_DECAY * step.saturating_sub(1) as f64).max(0.0)
    }
}

impl Default for TrendForecaster {
    fn default() -> Self {
        Self {
            name: "Trend Extrapolation".to_string(),
            config: ForecastConfig::default(),
            time_of_day: TimeOfDayProfile::default(),
        }
    }
}

impl TrafficForecaster for TrendForecaster {
    fn forecast(
        &self,
        window: &[Sample],
        location_id: &str,
        horizon: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Prediction> {
        let Some(trend) = WindowTrend::from_window(window, horizon, &self.config, &self.name) else {
            return Vec::new();
        };

        let last = trend.last;
        let offset = self.config.local_offset();

        let predictions: Vec<Prediction> = step_timestamps(last.timestamp, horizon, &self.config)
            .map(|(i, timestamp)| {
                let step = i as f64;
                let time_of_day = self.time_of_day.factor_at(&timestamp.with_timezone(&offset));
                let jitter = rng.gen_range(JITTER_LOW..JITTER_HIGH);
                let weight = Self::time_weight(i);

                let predicted_congestion = clamp_finite(
                    last.congestion_level + trend.congestion * step * jitter * time_of_day * weight,
                    0.0,
                    100.0,
                );
                let predicted_speed = floor_finite(
                    last.average_speed + trend.speed * step * jitter * (1.0 / time_of_day) * weight,
                    self.config.speed_floor,
                );

                trace!(step = i, jitter, weight, predicted_congestion, predicted_speed, "forecast step");

                Prediction {
                    timestamp,
                    predicted_congestion,
                    predicted_speed,
                    confidence: self.config.confidence_at(i),
                    factors: PredictionFactors {
                        time_of_day_factor: time_of_day,
                        ..PredictionFactors::default()
                    },
                }
            })
            .collect();

        debug!(
            model = %self.name,
            location_id,
            horizon,
            congestion_trend = trend.congestion,
            "generated predictions"
        );

        predictions
    }

    fn config(&self) -> &ForecastConfig {
        &self.config
    }

    fn name(&self) -> &str {
        &self.name
    }
}
