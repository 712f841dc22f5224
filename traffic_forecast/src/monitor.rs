//! Monitoring session tying a sample source to a forecaster
//!
//! A [`TrafficMonitor`] plays the role of the dashboard's refresh loop: each
//! tick pulls one reading, scores a stored run against everything realized
//! so far, and periodically issues a new run. The scored run is the newest
//! one whose whole horizon has been realized, or the latest run's realized
//! prefix before any run has completed.

use crate::data::Prediction;
use crate::error::Result;
use crate::history::{PredictionHistory, PredictionRun, DEFAULT_HISTORY_CAPACITY};
use crate::metrics::ReliabilityReport;
use crate::models::TrafficForecaster;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use traffic_feed::{LiveWindow, Sample, SampleSource, HISTORICAL_DATA_POINTS};

/// Realized samples retained for scoring
pub const DEFAULT_REALIZED_CAPACITY: usize = 96;

/// Settings for a monitoring session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorOptions {
    pub location_id: String,
    /// Forecast steps per run; the forecaster's default when `None`
    pub horizon: Option<usize>,
    /// Issue a new run every this many ticks
    pub predict_every: usize,
    /// Samples in the live window fed to the forecaster
    pub window_capacity: usize,
    /// Realized samples kept for alignment
    pub realized_capacity: usize,
    pub history_capacity: usize,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            location_id: "city-center".to_string(),
            horizon: None,
            predict_every: 3,
            window_capacity: HISTORICAL_DATA_POINTS,
            realized_capacity: DEFAULT_REALIZED_CAPACITY,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickOutcome {
    pub sample: Sample,
    /// Present when a new run was issued on this tick
    pub predictions: Option<Vec<Prediction>>,
    /// Score of the newest fully realized run, else of the latest run's
    /// realized steps
    pub reliability: Option<ReliabilityReport>,
}

/// A running forecast-and-evaluate loop for one location
#[derive(Debug)]
pub struct TrafficMonitor<S, F> {
    source: S,
    forecaster: F,
    options: MonitorOptions,
    window: LiveWindow,
    realized: LiveWindow,
    history: PredictionHistory,
    rng: StdRng,
    ticks: u64,
}

impl<S: SampleSource, F: TrafficForecaster> TrafficMonitor<S, F> {
    /// Monitor drawing its weather randomness from OS entropy
    pub fn new(source: S, forecaster: F, options: MonitorOptions) -> Self {
        Self::with_rng(source, forecaster, options, StdRng::from_entropy())
    }

    /// Monitor with reproducible forecasts
    pub fn seeded(source: S, forecaster: F, options: MonitorOptions, seed: u64) -> Self {
        Self::with_rng(source, forecaster, options, StdRng::seed_from_u64(seed))
    }

    fn with_rng(source: S, forecaster: F, options: MonitorOptions, rng: StdRng) -> Self {
        Self {
            window: LiveWindow::new(options.window_capacity),
            realized: LiveWindow::new(options.realized_capacity),
            history: PredictionHistory::new(options.history_capacity),
            source,
            forecaster,
            options,
            rng,
            ticks: 0,
        }
    }

    /// Fill the live window from the source's history and issue a first run
    pub fn bootstrap(&mut self) -> Result<Vec<Prediction>> {
        let samples = self.source.historical_samples(&self.options.location_id)?;
        info!(
            location_id = %self.options.location_id,
            samples = samples.len(),
            model = self.forecaster.name(),
            "bootstrapping monitor"
        );

        self.window.extend(samples);
        Ok(self.issue_run())
    }

    /// Pull one reading, score the newest realized run and issue a new one when due
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let sample = self.source.current_sample(&self.options.location_id)?;
        self.window.push(sample.clone());
        self.realized.push(sample.clone());
        self.ticks += 1;

        let realized = self.realized.as_slice();
        let location_id = self.options.location_id.as_str();
        let reliability = self
            .history
            .latest_complete(location_id, realized)
            .or_else(|| self.history.latest(location_id))
            .and_then(|run| run.evaluate(realized));

        let predictions = if self.ticks % self.options.predict_every.max(1) as u64 == 0 {
            Some(self.issue_run()).filter(|predictions| !predictions.is_empty())
        } else {
            None
        };

        debug!(
            tick = self.ticks,
            congestion = sample.congestion_level,
            speed = sample.average_speed,
            issued = predictions.is_some(),
            scored = reliability.is_some(),
            "monitor tick"
        );

        Ok(TickOutcome {
            sample,
            predictions,
            reliability,
        })
    }

    fn issue_run(&mut self) -> Vec<Prediction> {
        let horizon = self
            .options
            .horizon
            .unwrap_or(self.forecaster.config().default_horizon);
        let window = self.window.as_slice();

        let Some(issued_at) = window.last().map(|s| s.timestamp) else {
            return Vec::new();
        };

        let predictions =
            self.forecaster
                .forecast(window, &self.options.location_id, horizon, &mut self.rng);

        if !predictions.is_empty() {
            self.history.record(PredictionRun::new(
                self.options.location_id.clone(),
                issued_at,
                predictions.clone(),
            ));
        }
        predictions
    }

    pub fn history(&self) -> &PredictionHistory {
        &self.history
    }

    /// Current live window, oldest first
    pub fn window(&self) -> Vec<Sample> {
        self.window.to_vec()
    }

    pub fn options(&self) -> &MonitorOptions {
        &self.options
    }

    pub fn forecaster(&self) -> &F {
        &self.forecaster
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Ticks since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ForecastConfig, WeatherMode};
    use crate::factors::{FactorTables, WeatherCondition};
    use crate::models::ContextualForecaster;
    use chrono::{Duration, TimeZone, Utc};
    use traffic_feed::{Clock, FeedError, MockSampleSource};

    fn mock_source() -> MockSampleSource {
        let start = Utc.with_ymd_and_hms(2024, 5, 7, 7, 0, 0).unwrap();
        MockSampleSource::seeded(21).with_clock(Clock::manual(start, Duration::minutes(5)))
    }

    fn forecaster() -> ContextualForecaster {
        let config = ForecastConfig {
            weather: WeatherMode::Fixed(WeatherCondition::Cloudy),
            ..ForecastConfig::default()
        };
        ContextualForecaster::new(config, FactorTables::default()).unwrap()
    }

    #[test]
    fn test_bootstrap_fills_window_and_history() {
        let mut monitor = TrafficMonitor::seeded(mock_source(), forecaster(), MonitorOptions::default(), 1);

        let predictions = monitor.bootstrap().unwrap();

        assert_eq!(predictions.len(), 6);
        assert_eq!(monitor.window().len(), HISTORICAL_DATA_POINTS);
        assert_eq!(monitor.history().len(), 1);
        assert_eq!(
            monitor.history().latest("city-center").unwrap().issued_at,
            monitor.window().last().unwrap().timestamp
        );
    }

    #[test]
    fn test_ticks_issue_and_score_runs() {
        let options = MonitorOptions {
            horizon: Some(4),
            predict_every: 6,
            ..MonitorOptions::default()
        };
        let mut monitor = TrafficMonitor::seeded(mock_source(), forecaster(), options, 1);
        monitor.bootstrap().unwrap();

        let outcomes: Vec<TickOutcome> = (0..12).map(|_| monitor.tick().unwrap()).collect();

        // Bootstrap run issued at 06:55; ticks land at 07:05, 07:10, ...
        // Steps at 07:10 and 07:25 are realized on ticks 2 and 5
        assert!(outcomes[0].reliability.is_none());
        assert_eq!(outcomes[1].reliability.unwrap().pairs, 1);
        assert_eq!(outcomes[3].reliability.unwrap().pairs, 1);
        assert_eq!(outcomes[4].reliability.unwrap().pairs, 2);
        assert_eq!(outcomes[5].reliability.unwrap().pairs, 2);
        // Tick 6 replaced the run; its first step (07:45) is still open
        assert!(outcomes[6].reliability.is_none());
        assert_eq!(outcomes[9].reliability.unwrap().pairs, 1);
        // The bootstrap run's last step (07:55) lands on tick 11
        assert_eq!(outcomes[10].reliability.unwrap().pairs, 4);
        assert_eq!(outcomes[11].reliability.unwrap().pairs, 4);

        let issued: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.predictions.is_some())
            .map(|(i, _)| i + 1)
            .collect();
        assert_eq!(issued, vec![6, 12]);
        assert_eq!(monitor.history().len(), 3);
        assert_eq!(monitor.ticks(), 12);
        assert_eq!(monitor.window().len(), HISTORICAL_DATA_POINTS);
    }

    #[test]
    fn test_default_session_scores_whole_runs() {
        let mut monitor =
            TrafficMonitor::seeded(mock_source(), ContextualForecaster::default(), MonitorOptions::default(), 1);
        let horizon = monitor.forecaster().config().default_horizon;
        monitor.bootstrap().unwrap();

        let outcomes: Vec<TickOutcome> = (0..36).map(|_| monitor.tick().unwrap()).collect();
        let pairs: Vec<usize> = outcomes
            .iter()
            .filter_map(|o| o.reliability.map(|r| r.pairs))
            .collect();

        // Bootstrap run: steps 07:10 through 08:25, the last realized on tick 17
        let first_whole = outcomes
            .iter()
            .position(|o| o.reliability.map_or(false, |r| r.pairs == horizon));
        assert_eq!(first_whole, Some(16));
        assert_eq!(pairs.last(), Some(&horizon));
        assert!(pairs.iter().all(|&p| p <= horizon));
    }

    #[test]
    fn test_seeded_monitors_agree() {
        let run = || {
            let mut monitor =
                TrafficMonitor::seeded(mock_source(), ContextualForecaster::default(), MonitorOptions::default(), 5);
            monitor.bootstrap().unwrap()
        };
        assert_eq!(run(), run());
    }

    #[derive(Debug)]
    struct FailingSource;

    impl SampleSource for FailingSource {
        fn historical_samples(&mut self, location_id: &str) -> traffic_feed::Result<Vec<Sample>> {
            Err(FeedError::UnknownLocation(location_id.to_string()))
        }

        fn current_sample(&mut self, location_id: &str) -> traffic_feed::Result<Sample> {
            Err(FeedError::NoData(location_id.to_string()))
        }
    }

    #[test]
    fn test_source_errors_propagate() {
        let mut monitor = TrafficMonitor::new(FailingSource, forecaster(), MonitorOptions::default());

        assert!(monitor.bootstrap().is_err());
        assert!(monitor.tick().is_err());
        assert_eq!(monitor.ticks(), 0);
        assert!(monitor.history().is_empty());
    }

    #[test]
    fn test_short_history_issues_nothing() {
        let source = mock_source().with_history_len(1);
        let mut monitor = TrafficMonitor::seeded(source, forecaster(), MonitorOptions::default(), 1);

        assert!(monitor.bootstrap().unwrap().is_empty());
        assert!(monitor.history().is_empty());
    }
}
