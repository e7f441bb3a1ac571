use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::SensorResult;
use crate::models::SensorReading;

/// Repository trait for sensor time series
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SensorReadingRepository: Send + Sync {
    /// Store a single reading
    async fn insert(&self, reading: SensorReading) -> SensorResult<()>;

    /// Store many readings in one logged batch (no-op for an empty vec)
    async fn insert_batch(&self, readings: Vec<SensorReading>) -> SensorResult<()>;

    /// Readings with `start <= timestamp <= end`, newest first
    async fn readings_for_sensor(
        &self,
        sensor_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SensorResult<Vec<SensorReading>>;

    /// Most recent reading of a sensor
    async fn latest_reading(&self, sensor_id: &str) -> SensorResult<Option<SensorReading>>;

    /// All readings taken at a location (secondary index)
    async fn readings_by_location(&self, location: &str) -> SensorResult<Vec<SensorReading>>;
}
