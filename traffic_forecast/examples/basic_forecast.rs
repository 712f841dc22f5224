use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use traffic_feed::{locations, Clock, MockSampleSource, SampleSource};
use traffic_forecast::{
    calculate_averages, calculate_reliability, ContextualForecaster, CongestionStatus,
    TrafficForecaster, TrendForecaster,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Traffic Forecast: Basic Forecasting Example");
    println!("===========================================\n");

    // Simulated Tuesday morning rush
    let start = Utc.with_ymd_and_hms(2024, 5, 7, 7, 30, 0).unwrap();
    let mut source = MockSampleSource::seeded(42).with_clock(Clock::manual(start, Duration::minutes(5)));

    let contextual = ContextualForecaster::default();
    let trend = TrendForecaster::default();
    let mut rng = StdRng::seed_from_u64(42);

    for location in locations() {
        let window = source.historical_samples(location.id)?;
        let averages = calculate_averages(&window);

        println!("{} ({})", location.name, location.id);
        println!(
            "  Last hour: {:.1}% congestion ({}), {:.1} mph",
            averages.congestion,
            CongestionStatus::from_level(averages.congestion),
            averages.speed
        );

        for model in [&contextual as &dyn TrafficForecaster, &trend] {
            let predictions = model.forecast(&window, location.id, 6, &mut rng);
            println!("  {}:", model.name());
            for prediction in &predictions {
                let weather = prediction
                    .factors
                    .weather_condition
                    .map_or_else(|| "-".to_string(), |c| c.to_string());
                println!(
                    "    {}  {:5.1}%  {:5.1} mph  confidence {:3.0}%  weather {}",
                    prediction.timestamp.format("%H:%M"),
                    prediction.predicted_congestion,
                    prediction.predicted_speed,
                    prediction.confidence,
                    weather
                );
            }

            // Compare against readings taken one per step
            let actuals: Vec<_> = (0..predictions.len())
                .map(|_| source.current_sample(location.id))
                .collect::<Result<_, _>>()?;
            if let Some(score) = calculate_reliability(&predictions, &actuals) {
                println!(
                    "    accuracy: congestion {:.1}%, speed {:.1}%",
                    score.congestion_accuracy, score.speed_accuracy
                );
            }
        }
        println!();
    }

    Ok(())
}
