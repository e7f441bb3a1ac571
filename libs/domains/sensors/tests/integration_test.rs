//! Integration tests for the Sensors domain
//!
//! These tests run against a real ScyllaDB via testcontainers to check:
//! - Clustering order (newest first)
//! - Inclusive time range bounds
//! - Batch inserts and the location index

use chrono::{DurationRound, TimeDelta, Utc};
use domain_sensors::*;
use test_utils::{assertions::*, TestDataBuilder, TestScylla};

// Timestamps are stored with millisecond precision
fn now_ms() -> chrono::DateTime<Utc> {
    Utc::now()
        .duration_trunc(TimeDelta::milliseconds(1))
        .unwrap()
}

async fn setup(test_name: &str) -> (TestScylla, CassandraSensorRepository, TestDataBuilder) {
    let builder = TestDataBuilder::from_test_name(test_name);
    let scylla = TestScylla::new(&builder.keyspace()).await;
    let repo = CassandraSensorRepository::init(scylla.session())
        .await
        .unwrap();
    (scylla, repo, builder)
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_insert_and_latest_reading() {
    let (_scylla, repo, builder) = setup("insert_and_latest").await;
    let sensor_id = builder.name("sensor", "kitchen");
    let now = now_ms();

    for minutes in [3, 1, 2] {
        let reading = SensorReading::new(
            &sensor_id,
            now - TimeDelta::minutes(minutes),
            20.0 + minutes as f64,
            40.0,
            500.0,
        );
        repo.insert(reading).await.unwrap();
    }

    let latest = repo.latest_reading(&sensor_id).await.unwrap();
    let latest = assert_some(latest, "latest reading");
    assert_eq!(latest.timestamp, now - TimeDelta::minutes(1));
    assert_eq!(latest.temperature, 21.0);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_latest_reading_for_unknown_sensor() {
    let (_scylla, repo, _builder) = setup("latest_unknown").await;
    assert!(repo.latest_reading("nobody").await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_range_is_inclusive_and_newest_first() {
    let (_scylla, repo, builder) = setup("range_inclusive").await;
    let sensor_id = builder.name("sensor", "range");
    let now = now_ms();

    let readings: Vec<SensorReading> = (0..10)
        .map(|i| SensorReading::new(&sensor_id, now - TimeDelta::minutes(i), 21.0, 50.0, 420.0))
        .collect();
    repo.insert_batch(readings).await.unwrap();

    let start = now - TimeDelta::minutes(5);
    let end = now - TimeDelta::minutes(2);
    let in_range = repo
        .readings_for_sensor(&sensor_id, start, end)
        .await
        .unwrap();

    assert_eq!(in_range.len(), 4, "minutes 2, 3, 4 and 5 ago");
    assert_eq!(in_range.first().map(|r| r.timestamp), Some(end));
    assert_eq!(in_range.last().map(|r| r.timestamp), Some(start));
    assert_descending_by(&in_range, |r| r.timestamp, "range readings");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_empty_batch_is_noop() {
    let (_scylla, repo, _builder) = setup("empty_batch").await;
    repo.insert_batch(Vec::new()).await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_readings_by_location() {
    let (_scylla, repo, builder) = setup("by_location").await;
    let now = now_ms();
    let garage = builder.name("sensor", "garage");
    let bedroom = builder.name("sensor", "bedroom");

    repo.insert_batch(vec![
        SensorReading::new(&garage, now, 12.0, 70.0, 900.0).at_location("Garage"),
        SensorReading::new(&bedroom, now, 21.0, 45.0, 600.0).at_location("Bedroom"),
        SensorReading::new(&garage, now - TimeDelta::minutes(1), 12.5, 71.0, 910.0)
            .at_location("Garage"),
    ])
    .await
    .unwrap();

    let at_garage = repo.readings_by_location("Garage").await.unwrap();
    assert_eq!(at_garage.len(), 2);
    assert!(at_garage.iter().all(|r| r.sensor_id == garage));

    assert!(repo.readings_by_location("Attic").await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_latest_for_sensors() {
    let (_scylla, repo, builder) = setup("service_latest").await;
    let service = SensorService::new(repo);
    let now = now_ms();
    let ids: Vec<String> = (1..=3).map(|i| builder.name("sensor", &i.to_string())).collect();

    for id in &ids[..2] {
        service
            .record(SensorReading::new(id, now, 22.0, 50.0, 450.0))
            .await
            .unwrap();
    }

    let latest = service.latest_for_sensors(&ids).await.unwrap();
    assert_eq!(latest.len(), 2);
    assert!(!latest.contains_key(&ids[2]));
}
