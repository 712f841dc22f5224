//! Contextual factor tables
//!
//! Each table maps a context key (hour and day type, month, weather
//! condition, location) to a multiplier where 1.0 is neutral. The tables are
//! plain data: they can be replaced wholesale through serde or edited field
//! by field before building a forecaster.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Hourly intensity multipliers for weekdays and weekends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDayProfile {
    /// Monday to Friday, indexed by hour 0-23
    pub weekday: [f64; 24],
    /// Saturday and Sunday, indexed by hour 0-23
    pub weekend: [f64; 24],
}

impl TimeOfDayProfile {
    /// Multiplier for `hour`; out-of-range hours and non-positive entries give 1.0
    pub fn factor(&self, hour: u32, weekend: bool) -> f64 {
        let curve = if weekend { &self.weekend } else { &self.weekday };
        curve
            .get(hour as usize)
            .copied()
            .filter(|value| value.is_finite() && *value > 0.0)
            .unwrap_or(1.0)
    }

    /// Multiplier for the local hour and day type of `time`
    pub fn factor_at<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> f64 {
        let weekend = matches!(time.weekday(), Weekday::Sat | Weekday::Sun);
        self.factor(time.hour(), weekend)
    }
}

impl Default for TimeOfDayProfile {
    fn default() -> Self {
        Self {
            // Commute peaks at 08:00 and 17:00
            weekday: [
                0.2, 0.15, 0.1, 0.1, 0.2, 0.5, 0.9, 1.6, 1.8, 1.4, 1.0, 1.0,
                1.1, 1.0, 1.0, 1.2, 1.5, 1.8, 1.6, 1.2, 0.9, 0.7, 0.5, 0.3,
            ],
            // Broad midday hump
            weekend: [
                0.3, 0.25, 0.2, 0.15, 0.1, 0.2, 0.3, 0.5, 0.7, 0.9, 1.1, 1.3,
                1.4, 1.4, 1.3, 1.2, 1.1, 1.0, 0.9, 0.8, 0.7, 0.6, 0.5, 0.4,
            ],
        }
    }
}

/// Monthly seasonality multipliers, January first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    pub monthly: [f64; 12],
}

impl SeasonalProfile {
    /// Multiplier for a 1-based `month`; anything else gives 1.0
    pub fn factor(&self, month: u32) -> f64 {
        month
            .checked_sub(1)
            .and_then(|index| self.monthly.get(index as usize))
            .copied()
            .filter(|value| value.is_finite() && *value > 0.0)
            .unwrap_or(1.0)
    }
}

impl Default for SeasonalProfile {
    fn default() -> Self {
        Self {
            monthly: [
                1.25, 1.2, 1.1, 1.05, 1.0, 1.0, 1.0, 1.0, 1.05, 1.1, 1.15, 1.25,
            ],
        }
    }
}

/// Simulated weather categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Fog,
    Storm,
}

impl WeatherCondition {
    /// Every condition, in draw order
    pub const ALL: [WeatherCondition; 6] = [
        WeatherCondition::Clear,
        WeatherCondition::Cloudy,
        WeatherCondition::Rain,
        WeatherCondition::Snow,
        WeatherCondition::Fog,
        WeatherCondition::Storm,
    ];

    /// Draw a condition uniformly at random
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "clear",
            WeatherCondition::Cloudy => "cloudy",
            WeatherCondition::Rain => "rain",
            WeatherCondition::Snow => "snow",
            WeatherCondition::Fog => "fog",
            WeatherCondition::Storm => "storm",
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Impact multiplier per weather condition, 1.0 for clear skies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherImpactTable {
    pub clear: f64,
    pub cloudy: f64,
    pub rain: f64,
    pub snow: f64,
    pub fog: f64,
    pub storm: f64,
}

impl WeatherImpactTable {
    pub fn impact(&self, condition: WeatherCondition) -> f64 {
        let value = match condition {
            WeatherCondition::Clear => self.clear,
            WeatherCondition::Cloudy => self.cloudy,
            WeatherCondition::Rain => self.rain,
            WeatherCondition::Snow => self.snow,
            WeatherCondition::Fog => self.fog,
            WeatherCondition::Storm => self.storm,
        };
        if value.is_finite() {
            value
        } else {
            1.0
        }
    }
}

impl Default for WeatherImpactTable {
    fn default() -> Self {
        Self {
            clear: 1.0,
            cloudy: 1.05,
            rain: 1.3,
            snow: 1.7,
            fog: 1.4,
            storm: 1.9,
        }
    }
}

/// All lookup tables used by the contextual forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FactorTables {
    pub time_of_day: TimeOfDayProfile,
    pub seasonal: SeasonalProfile,
    pub weather: WeatherImpactTable,
    /// Scale applied to contextual deviations per location; missing ids are neutral
    pub location_sensitivity: HashMap<String, f64>,
}

impl FactorTables {
    /// Sensitivity for `location_id`, 1.0 when unknown
    pub fn location_sensitivity(&self, location_id: &str) -> f64 {
        self.location_sensitivity
            .get(location_id)
            .copied()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(1.0)
    }
}

impl Default for FactorTables {
    fn default() -> Self {
        let location_sensitivity = [
            ("city-center", 1.2),
            ("north-highway", 0.9),
            ("south-bridge", 1.0),
        ]
        .into_iter()
        .map(|(id, value)| (id.to_string(), value))
        .collect();

        Self {
            time_of_day: TimeOfDayProfile::default(),
            seasonal: SeasonalProfile::default(),
            weather: WeatherImpactTable::default(),
            location_sensitivity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    #[case(8, false, 1.8)]
    #[case(17, false, 1.8)]
    #[case(3, false, 0.1)]
    #[case(12, true, 1.4)]
    #[case(4, true, 0.1)]
    #[case(24, false, 1.0)]
    #[case(99, true, 1.0)]
    fn test_time_of_day_factor(#[case] hour: u32, #[case] weekend: bool, #[case] expected: f64) {
        assert_eq!(TimeOfDayProfile::default().factor(hour, weekend), expected);
    }

    #[test]
    fn test_time_of_day_curves_stay_in_range() {
        let profile = TimeOfDayProfile::default();
        for value in profile.weekday.iter().chain(profile.weekend.iter()) {
            assert!((0.1..=1.8).contains(value));
        }
    }

    #[test]
    fn test_non_positive_entry_is_neutral() {
        let mut profile = TimeOfDayProfile::default();
        profile.weekday[9] = 0.0;
        assert_eq!(profile.factor(9, false), 1.0);
    }

    #[test]
    fn test_factor_at_uses_local_time() {
        let profile = TimeOfDayProfile::default();
        // Saturday 23:30 UTC is Sunday 01:30 at UTC+2
        let utc = Utc.with_ymd_and_hms(2024, 6, 1, 23, 30, 0).unwrap();
        let local = utc.with_timezone(&FixedOffset::east_opt(2 * 3600).unwrap());

        assert_eq!(profile.factor_at(&utc), profile.weekend[23]);
        assert_eq!(profile.factor_at(&local), profile.weekend[1]);

        // Monday 08:00 UTC
        let monday = Utc.with_ymd_and_hms(2024, 6, 3, 8, 0, 0).unwrap();
        assert_eq!(profile.factor_at(&monday), 1.8);
    }

    #[rstest]
    #[case(1, 1.25)]
    #[case(5, 1.0)]
    #[case(12, 1.25)]
    #[case(0, 1.0)]
    #[case(13, 1.0)]
    fn test_seasonal_factor(#[case] month: u32, #[case] expected: f64) {
        assert_eq!(SeasonalProfile::default().factor(month), expected);
    }

    #[test]
    fn test_weather_impacts() {
        let table = WeatherImpactTable::default();
        for condition in WeatherCondition::ALL {
            let impact = table.impact(condition);
            assert!((1.0..=1.9).contains(&impact), "{condition}: {impact}");
        }
        assert!(table.impact(WeatherCondition::Storm) > table.impact(WeatherCondition::Rain));
        assert!(table.impact(WeatherCondition::Snow) > table.impact(WeatherCondition::Fog));
    }

    #[test]
    fn test_random_weather_covers_all_conditions() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(WeatherCondition::random(&mut rng));
        }
        assert_eq!(seen.len(), WeatherCondition::ALL.len());
    }

    #[test]
    fn test_location_sensitivity() {
        let tables = FactorTables::default();
        assert_eq!(tables.location_sensitivity("city-center"), 1.2);
        assert_eq!(tables.location_sensitivity("ring-road"), 1.0);
    }

    #[test]
    fn test_tables_from_partial_json() {
        let json = r#"{ "locationSensitivity": { "ring-road": 1.5 } }"#;
        let tables: FactorTables = serde_json::from_str(json).unwrap();

        assert_eq!(tables.location_sensitivity("ring-road"), 1.5);
        assert_eq!(tables.location_sensitivity("city-center"), 1.0);
        assert_eq!(tables.seasonal, SeasonalProfile::default());
        assert_eq!(
            serde_json::to_string(&WeatherCondition::Storm).unwrap(),
            "\"storm\""
        );
    }
}
