// This program explores the module structure of the traffic forecasting libraries
use traffic_pulse::feed::{locations, MockSampleSource, SampleSource};
use traffic_pulse::forecast::{
    ContextualForecaster, FactorTables, ForecastConfig, TrafficForecaster, TrendForecaster,
    WeatherCondition,
};
use traffic_pulse::math::LinearTrend;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Exploring traffic forecasting libraries\n");

    println!("=== Traffic Feed ===");
    show_feed(&mut MockSampleSource::seeded(1))?;

    println!("\n=== Traffic Forecast ===");
    show_forecast();

    println!("\n=== Traffic Math ===");
    show_math()?;

    println!("\nDone exploring");
    Ok(())
}

fn show_feed(source: &mut MockSampleSource) -> Result<(), Box<dyn std::error::Error>> {
    println!("Monitored locations:");
    for location in locations() {
        let sample = source.current_sample(location.id)?;
        println!(
            "- {:<14} ({:.4}, {:.4})  now {:.1}% congestion at {:.1} mph",
            location.name, location.latitude, location.longitude, sample.congestion_level, sample.average_speed
        );
    }

    println!("\nUsage example (see traffic_feed/tests for more):");
    println!(
        r#"
    use traffic_feed::{{LiveWindow, MockSampleSource, SampleSource}};

    let mut source = MockSampleSource::seeded(7);
    let mut window = LiveWindow::default();
    window.extend(source.historical_samples("city-center")?);
    window.push(source.current_sample("city-center")?);
    "#
    );
    Ok(())
}

fn show_forecast() {
    let contextual = ContextualForecaster::default();
    let trend = TrendForecaster::default();

    println!("Available forecasters:");
    for model in [&contextual as &dyn TrafficForecaster, &trend] {
        let config = model.config();
        println!(
            "- {}: {} steps of {} minutes, confidence {}% falling {} per step to {}%",
            model.name(),
            config.default_horizon,
            config.step_minutes,
            config.confidence_start,
            config.confidence_decay,
            config.confidence_floor
        );
    }

    let tables = FactorTables::default();
    println!("\nWeather impacts:");
    for condition in WeatherCondition::ALL {
        println!("- {:<7} x{:.2}", condition, tables.weather.impact(condition));
    }

    println!("\nDefault config as JSON:");
    match serde_json::to_string_pretty(&ForecastConfig::default()) {
        Ok(json) => println!("{json}"),
        Err(e) => println!("(unavailable: {e})"),
    }
}

fn show_math() -> Result<(), Box<dyn std::error::Error>> {
    let values = [40.0, 45.0, 50.0, 55.0, 60.0];
    let trend = LinearTrend::fit(&values)?;

    println!("Trend of {values:?}:");
    println!("- slope {:.2}, intercept {:.2}", trend.slope(), trend.intercept());
    println!("- next value {:.2}", trend.project(1));
    Ok(())
}
