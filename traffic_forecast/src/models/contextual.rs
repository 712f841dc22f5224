//! Trend extrapolation with contextual multipliers
//!
//! Each forecast point starts from the last observed sample and adds:
//!
//! - the congestion trend and the inverse of the speed trend, scaled by step
//! - the deviation from 1 of the time-of-day, weather and seasonal factors,
//!   scaled by the location's sensitivity
//!
//! Speed then follows the predicted congestion change inversely and drops
//! further with bad weather. Every coefficient is a fixed constant from
//! [`ForecastConfig`]; nothing is fitted.

use crate::config::{ForecastConfig, WeatherMode};
use crate::data::{Prediction, PredictionFactors};
use crate::error::Result;
use crate::factors::{FactorTables, WeatherCondition};
use crate::models::{step_timestamps, TrafficForecaster, WindowTrend};
use chrono::Datelike;
use rand::RngCore;
use tracing::{debug, trace};
use traffic_feed::Sample;
use traffic_math::{clamp_finite, floor_finite};

/// The traffic forecast engine
#[derive(Debug, Clone)]
pub struct ContextualForecaster {
    /// Name of the model
    name: String,
    config: ForecastConfig,
    tables: FactorTables,
}

impl ContextualForecaster {
    /// Create a forecaster from validated settings and factor tables
    pub fn new(config: ForecastConfig, tables: FactorTables) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: "Contextual Trend".to_string(),
            config,
            tables,
        })
    }

    /// The factor tables in use
    pub fn tables(&self) -> &FactorTables {
        &self.tables
    }

    fn weather_for_step(&self, rng: &mut dyn RngCore) -> Option<WeatherCondition> {
        match self.config.weather {
            WeatherMode::Random => Some(WeatherCondition::random(rng)),
            WeatherMode::Fixed(condition) => Some(condition),
            WeatherMode::Disabled => None,
        }
    }
}

impl Default for ContextualForecaster {
    fn default() -> Self {
        Self {
            name: "Contextual Trend".to_string(),
            config: ForecastConfig::default(),
            tables: FactorTables::default(),
        }
    }
}

impl TrafficForecaster for ContextualForecaster {
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
        let weights = &self.config.weights;
        let offset = self.config.local_offset();
        let sensitivity = self.tables.location_sensitivity(location_id);

        let predictions: Vec<Prediction> = step_timestamps(last.timestamp, horizon, &self.config)
            .map(|(i, timestamp)| {
                let step = i as f64;
                let local = timestamp.with_timezone(&offset);

                let time_of_day = self.tables.time_of_day.factor_at(&local);
                let seasonal = self.tables.seasonal.factor(local.month());
                let weather = self.weather_for_step(rng);
                let weather_impact = weather.map_or(1.0, |c| self.tables.weather.impact(c));

                let contextual = sensitivity
                    * (weights.time_of_day * (time_of_day - 1.0)
                        + weights.weather * (weather_impact - 1.0)
                        + weights.seasonal * (seasonal - 1.0));

                let predicted_congestion = clamp_finite(
                    last.congestion_level + weights.trend * trend.congestion * step
                        - weights.speed_trend * trend.speed * step
                        + contextual,
                    0.0,
                    100.0,
                );

                let congestion_shift = predicted_congestion - last.congestion_level;
                let congestion_multiplier =
                    (1.0 - weights.speed_congestion_sensitivity * congestion_shift / 100.0).max(0.0);
                let weather_multiplier =
                    (1.0 - weights.speed_weather_sensitivity * (weather_impact - 1.0)).max(0.0);

                let predicted_speed = floor_finite(
                    (last.average_speed + trend.speed * step)
                        * congestion_multiplier
                        * weather_multiplier,
                    self.config.speed_floor,
                );

                trace!(
                    step = i,
                    time_of_day,
                    weather_impact,
                    seasonal,
                    predicted_congestion,
                    predicted_speed,
                    "forecast step"
                );

                Prediction {
                    timestamp,
                    predicted_congestion,
                    predicted_speed,
                    confidence: self.config.confidence_at(i),
                    factors: PredictionFactors {
                        time_of_day_factor: time_of_day,
                        weather_condition: weather,
                        weather_impact,
                        seasonal_factor: seasonal,
                    },
                }
            })
            .collect();

        debug!(
            model = %self.name,
            location_id,
            horizon,
            congestion_trend = trend.congestion,
            speed_trend = trend.speed,
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
