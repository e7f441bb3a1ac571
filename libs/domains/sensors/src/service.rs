//! Sensor Service - validation and multi-sensor queries

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{SensorError, SensorResult};
use crate::models::SensorReading;
use crate::repository::SensorReadingRepository;

pub struct SensorService<R: SensorReadingRepository> {
    repository: Arc<R>,
}

impl<R: SensorReadingRepository> SensorService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Validate and store a reading
    #[instrument(skip(self, reading), fields(sensor_id = %reading.sensor_id))]
    pub async fn record(&self, reading: SensorReading) -> SensorResult<()> {
        reading.check()?;
        self.repository.insert(reading).await
    }

    /// Validate every reading, then store them in one batch
    ///
    /// Nothing is written when any reading is invalid.
    #[instrument(skip(self, readings), fields(count = readings.len()))]
    pub async fn record_batch(&self, readings: Vec<SensorReading>) -> SensorResult<()> {
        for reading in &readings {
            reading.check()?;
        }
        self.repository.insert_batch(readings).await
    }

    /// Latest reading per sensor; sensors without data are left out
    #[instrument(skip(self, sensor_ids))]
    pub async fn latest_for_sensors(
        &self,
        sensor_ids: &[String],
    ) -> SensorResult<BTreeMap<String, SensorReading>> {
        let mut latest = BTreeMap::new();
        for sensor_id in sensor_ids {
            match self.repository.latest_reading(sensor_id).await? {
                Some(reading) => {
                    latest.insert(sensor_id.clone(), reading);
                }
                None => debug!(sensor_id = %sensor_id, "No readings yet"),
            }
        }
        Ok(latest)
    }

    /// Latest reading of one sensor, `NotFound` when it never reported
    #[instrument(skip(self))]
    pub async fn latest(&self, sensor_id: &str) -> SensorResult<SensorReading> {
        self.repository
            .latest_reading(sensor_id)
            .await?
            .ok_or_else(|| SensorError::NotFound(sensor_id.to_string()))
    }

    /// Readings of a sensor within `[start, end]`, newest first
    #[instrument(skip(self))]
    pub async fn readings_in_range(
        &self,
        sensor_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SensorResult<Vec<SensorReading>> {
        if start > end {
            return Err(SensorError::Validation(format!(
                "range start {} is after end {}",
                start, end
            )));
        }
        self.repository
            .readings_for_sensor(sensor_id, start, end)
            .await
    }

    #[instrument(skip(self))]
    pub async fn readings_at(&self, location: &str) -> SensorResult<Vec<SensorReading>> {
        self.repository.readings_by_location(location).await
    }
}

impl<R: SensorReadingRepository> Clone for SensorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockSensorReadingRepository;
    use chrono::Duration;
    use mockall::predicate::eq;

    fn reading(sensor_id: &str, minutes_ago: i64) -> SensorReading {
        SensorReading::new(
            sensor_id,
            Utc::now() - Duration::minutes(minutes_ago),
            22.4,
            55.0,
            640.0,
        )
    }

    #[tokio::test]
    async fn test_record_valid_reading() {
        let mut mock_repo = MockSensorReadingRepository::new();
        mock_repo
            .expect_insert()
            .withf(|r| r.sensor_id == "sensor-1")
            .times(1)
            .returning(|_| Ok(()));

        let service = SensorService::new(mock_repo);
        service.record(reading("sensor-1", 0)).await.unwrap();
    }

    #[tokio::test]
    async fn test_record_invalid_reading_skips_repository() {
        let mut mock_repo = MockSensorReadingRepository::new();
        mock_repo.expect_insert().never();

        let mut invalid = reading("sensor-1", 0);
        invalid.humidity = 140.0;

        let service = SensorService::new(mock_repo);
        let result = service.record(invalid).await;
        assert!(matches!(result, Err(SensorError::Validation(_))));
    }

    #[tokio::test]
    async fn test_record_batch_rejects_whole_batch() {
        let mut mock_repo = MockSensorReadingRepository::new();
        mock_repo.expect_insert_batch().never();

        let mut bad = reading("sensor-2", 1);
        bad.co2_level = f64::INFINITY;

        let service = SensorService::new(mock_repo);
        let result = service
            .record_batch(vec![reading("sensor-2", 0), bad])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_record_batch_passes_all_readings() {
        let mut mock_repo = MockSensorReadingRepository::new();
        mock_repo
            .expect_insert_batch()
            .withf(|readings| readings.len() == 3)
            .times(1)
            .returning(|_| Ok(()));

        let service = SensorService::new(mock_repo);
        let batch = (0..3).map(|i| reading("sensor-3", i)).collect();
        service.record_batch(batch).await.unwrap();
    }

    #[tokio::test]
    async fn test_latest_for_sensors_omits_silent_sensors() {
        let mut mock_repo = MockSensorReadingRepository::new();
        mock_repo
            .expect_latest_reading()
            .with(eq("sensor-1"))
            .returning(|id| Ok(Some(reading(id, 0))));
        mock_repo
            .expect_latest_reading()
            .with(eq("sensor-2"))
            .returning(|_| Ok(None));

        let service = SensorService::new(mock_repo);
        let ids = vec!["sensor-1".to_string(), "sensor-2".to_string()];
        let latest = service.latest_for_sensors(&ids).await.unwrap();

        assert_eq!(latest.len(), 1);
        assert!(latest.contains_key("sensor-1"));
        assert!(!latest.contains_key("sensor-2"));
    }

    #[tokio::test]
    async fn test_latest_not_found() {
        let mut mock_repo = MockSensorReadingRepository::new();
        mock_repo.expect_latest_reading().returning(|_| Ok(None));

        let service = SensorService::new(mock_repo);
        let result = service.latest("sensor-9").await;
        assert!(matches!(result, Err(SensorError::NotFound(id)) if id == "sensor-9"));
    }

    #[tokio::test]
    async fn test_readings_in_range_rejects_inverted_range() {
        let mut mock_repo = MockSensorReadingRepository::new();
        mock_repo.expect_readings_for_sensor().never();

        let end = Utc::now();
        let start = end + Duration::minutes(5);

        let service = SensorService::new(mock_repo);
        let result = service.readings_in_range("sensor-1", start, end).await;
        assert!(matches!(result, Err(SensorError::Validation(_))));
    }

    #[tokio::test]
    async fn test_readings_in_range_accepts_single_instant() {
        let at = Utc::now();
        let mut mock_repo = MockSensorReadingRepository::new();
        mock_repo
            .expect_readings_for_sensor()
            .with(eq("sensor-1"), eq(at), eq(at))
            .returning(|_, _, _| Ok(vec![]));

        let service = SensorService::new(mock_repo);
        let readings = service.readings_in_range("sensor-1", at, at).await.unwrap();
        assert!(readings.is_empty());
    }

    #[tokio::test]
    async fn test_readings_at_location() {
        let mut mock_repo = MockSensorReadingRepository::new();
        mock_repo
            .expect_readings_by_location()
            .with(eq("Living Room"))
            .returning(|location| Ok(vec![reading("sensor-4", 0).at_location(location)]));

        let service = SensorService::new(mock_repo);
        let readings = service.readings_at("Living Room").await.unwrap();
        assert_eq!(readings[0].location.as_deref(), Some("Living Room"));
    }
}
