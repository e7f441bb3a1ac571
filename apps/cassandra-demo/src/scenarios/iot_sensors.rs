//! Sensor readings stored as a time series per sensor

use chrono::{DateTime, TimeDelta, Utc};
use database::cassandra::CassandraContext;
use domain_sensors::{CassandraSensorRepository, SensorReading, SensorService};
use eyre::Result;
use rand::Rng;

use crate::config::DemoSettings;

pub const LOCATIONS: [&str; 5] = ["Kitchen", "Living Room", "Bedroom", "Bathroom", "Garage"];

const QUERY_LOCATION: &str = "Living Room";
const RANGE_MINUTES: i64 = 30;

pub fn sensor_ids(count: u32) -> Vec<String> {
    (1..=count).map(|i| format!("sensor-{}", i)).collect()
}

/// One reading per minute going back from `now`, all at the same location
pub fn simulate_readings<R: Rng>(
    rng: &mut R,
    sensor_id: &str,
    location: &str,
    count: u32,
    now: DateTime<Utc>,
) -> Vec<SensorReading> {
    (0..count)
        .map(|i| {
            SensorReading::new(
                sensor_id,
                now - TimeDelta::minutes(i64::from(i)),
                round_to_tenth(rng.random_range(18.0..28.0)),
                round_to_tenth(rng.random_range(30.0..90.0)),
                rng.random_range(400.0_f64..1400.0).round(),
            )
            .at_location(location)
        })
        .collect()
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn format_reading(reading: &SensorReading) -> String {
    format!(
        "{} - {:.1}°C, {:.1}% humidity, {:.0} ppm CO2, {} @ {}",
        reading.sensor_id,
        reading.temperature,
        reading.humidity,
        reading.co2_level,
        reading.location.as_deref().unwrap_or("unknown"),
        reading.timestamp.format("%H:%M:%S"),
    )
}

pub async fn run(context: &CassandraContext, settings: &DemoSettings) -> Result<()> {
    let repository = CassandraSensorRepository::init(context.session()).await?;
    let service = SensorService::new(repository);

    let ids = sensor_ids(settings.sensor_count);
    let now = Utc::now();

    // ThreadRng is not Send, so every batch is generated before the first await
    let batches: Vec<(String, Vec<SensorReading>)> = {
        let mut rng = rand::rng();
        ids.iter()
            .map(|id| {
                let location = LOCATIONS[rng.random_range(0..LOCATIONS.len())];
                let readings =
                    simulate_readings(&mut rng, id, location, settings.readings_per_sensor, now);
                (location.to_string(), readings)
            })
            .collect()
    };

    println!(
        "Simulating {} sensors with {} readings each",
        ids.len(),
        settings.readings_per_sensor
    );
    for (location, readings) in batches {
        let count = readings.len();
        let sensor_id = readings
            .first()
            .map(|r| r.sensor_id.clone())
            .unwrap_or_default();
        service.record_batch(readings).await?;
        println!("Inserted {} readings for {} in {}", count, sensor_id, location);
    }

    println!("\n--- Latest reading per sensor ---");
    for reading in service.latest_for_sensors(&ids).await?.values() {
        println!("  {}", format_reading(reading));
    }

    if let Some(first) = ids.first() {
        let start = now - TimeDelta::minutes(RANGE_MINUTES);
        println!("\n--- {} over the last {} minutes ---", first, RANGE_MINUTES);
        let readings = service.readings_in_range(first, start, now).await?;
        for reading in &readings {
            println!("  {}", format_reading(reading));
        }
        println!("  ({} readings)", readings.len());
    }

    println!("\n--- Readings in {} ---", QUERY_LOCATION);
    let at_location = service.readings_at(QUERY_LOCATION).await?;
    if at_location.is_empty() {
        println!("  No sensor was placed there this run");
    }
    for reading in &at_location {
        println!("  {}", format_reading(reading));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sensor_ids() {
        assert_eq!(sensor_ids(3), vec!["sensor-1", "sensor-2", "sensor-3"]);
        assert!(sensor_ids(0).is_empty());
    }

    #[test]
    fn test_simulated_values_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc::now();
        let readings = simulate_readings(&mut rng, "sensor-1", "Garage", 50, now);

        assert_eq!(readings.len(), 50);
        for reading in &readings {
            assert!((18.0..=28.0).contains(&reading.temperature));
            assert!((30.0..=90.0).contains(&reading.humidity));
            assert!((400.0..=1400.0).contains(&reading.co2_level));
            assert_eq!(reading.co2_level.fract(), 0.0);
            assert_eq!(reading.location.as_deref(), Some("Garage"));
            assert!(reading.check().is_ok());
        }
    }

    #[test]
    fn test_simulated_timestamps_one_minute_apart() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();
        let readings = simulate_readings(&mut rng, "sensor-2", "Kitchen", 3, now);

        assert_eq!(readings[0].timestamp, now);
        assert_eq!(readings[2].timestamp, now - TimeDelta::minutes(2));
    }

    #[test]
    fn test_round_to_tenth() {
        assert_eq!(round_to_tenth(21.349), 21.3);
        assert_eq!(round_to_tenth(21.35), 21.4);
    }

    #[test]
    fn test_format_reading() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T10:15:30Z")
            .unwrap()
            .with_timezone(&Utc);
        let reading = SensorReading::new("sensor-4", at, 22.5, 45.0, 812.0).at_location("Bedroom");
        assert_eq!(
            format_reading(&reading),
            "sensor-4 - 22.5°C, 45.0% humidity, 812 ppm CO2, Bedroom @ 10:15:30"
        );
    }
}
