//! Cassandra implementation of SensorReadingRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::cassandra::{
    apply_schema, mapper, Batch, BatchType, CassandraSession, PreparedStatement,
};
use scylla::{DeserializeRow, SerializeRow};
use tracing::{debug, instrument};

use crate::error::SensorResult;
use crate::models::SensorReading;
use crate::repository::SensorReadingRepository;

pub const TABLE: &str = "sensor_readings";

pub const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sensor_readings (
    sensor_id text,
    timestamp timestamp,
    temperature double,
    humidity double,
    co2_level double,
    location text,
    PRIMARY KEY (sensor_id, timestamp)
) WITH CLUSTERING ORDER BY (timestamp DESC)
"#;

pub const CREATE_LOCATION_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS ON sensor_readings (location)";

const INSERT: &str = "INSERT INTO sensor_readings \
    (sensor_id, timestamp, temperature, humidity, co2_level, location) \
    VALUES (?, ?, ?, ?, ?, ?)";

const SELECT_RANGE: &str = "SELECT sensor_id, timestamp, temperature, humidity, co2_level, location \
    FROM sensor_readings WHERE sensor_id = ? AND timestamp >= ? AND timestamp <= ?";

const SELECT_LATEST: &str = "SELECT sensor_id, timestamp, temperature, humidity, co2_level, location \
    FROM sensor_readings WHERE sensor_id = ? LIMIT 1";

const SELECT_BY_LOCATION: &str = "SELECT sensor_id, timestamp, temperature, humidity, co2_level, location \
    FROM sensor_readings WHERE location = ?";

/// Row layout of `sensor_readings`
#[derive(Debug, DeserializeRow, SerializeRow)]
struct SensorReadingRow {
    sensor_id: String,
    timestamp: DateTime<Utc>,
    temperature: f64,
    humidity: f64,
    co2_level: f64,
    location: Option<String>,
}

impl From<SensorReading> for SensorReadingRow {
    fn from(reading: SensorReading) -> Self {
        Self {
            sensor_id: reading.sensor_id,
            timestamp: reading.timestamp,
            temperature: reading.temperature,
            humidity: reading.humidity,
            co2_level: reading.co2_level,
            location: reading.location,
        }
    }
}

impl From<SensorReadingRow> for SensorReading {
    fn from(row: SensorReadingRow) -> Self {
        Self {
            sensor_id: row.sensor_id,
            timestamp: row.timestamp,
            temperature: row.temperature,
            humidity: row.humidity,
            co2_level: row.co2_level,
            location: row.location,
        }
    }
}

/// Cassandra implementation of the SensorReadingRepository
pub struct CassandraSensorRepository {
    session: CassandraSession,
    insert: PreparedStatement,
    select_range: PreparedStatement,
    select_latest: PreparedStatement,
    select_by_location: PreparedStatement,
}

impl CassandraSensorRepository {
    /// Create the table and index if needed, then prepare every statement
    pub async fn init(session: CassandraSession) -> SensorResult<Self> {
        apply_schema(&session, TABLE, &[CREATE_TABLE, CREATE_LOCATION_INDEX]).await?;

        Ok(Self {
            insert: mapper::prepare(&session, INSERT).await?,
            select_range: mapper::prepare(&session, SELECT_RANGE).await?,
            select_latest: mapper::prepare(&session, SELECT_LATEST).await?,
            select_by_location: mapper::prepare(&session, SELECT_BY_LOCATION).await?,
            session,
        })
    }
}

#[async_trait]
impl SensorReadingRepository for CassandraSensorRepository {
    #[instrument(skip(self, reading), fields(sensor_id = %reading.sensor_id))]
    async fn insert(&self, reading: SensorReading) -> SensorResult<()> {
        let row = SensorReadingRow::from(reading);
        mapper::execute(&self.session, &self.insert, row).await?;
        Ok(())
    }

    #[instrument(skip(self, readings), fields(count = readings.len()))]
    async fn insert_batch(&self, readings: Vec<SensorReading>) -> SensorResult<()> {
        if readings.is_empty() {
            return Ok(());
        }

        let mut batch = Batch::new(BatchType::Logged);
        for _ in &readings {
            batch.append_statement(self.insert.clone());
        }

        let rows: Vec<SensorReadingRow> = readings.into_iter().map(Into::into).collect();
        mapper::execute_batch(&self.session, &batch, rows).await?;

        debug!("Sensor batch written");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn readings_for_sensor(
        &self,
        sensor_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> SensorResult<Vec<SensorReading>> {
        let rows: Vec<SensorReadingRow> =
            mapper::fetch_all(&self.session, &self.select_range, (sensor_id, start, end)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn latest_reading(&self, sensor_id: &str) -> SensorResult<Option<SensorReading>> {
        let row: Option<SensorReadingRow> =
            mapper::fetch_optional(&self.session, &self.select_latest, (sensor_id,)).await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn readings_by_location(&self, location: &str) -> SensorResult<Vec<SensorReading>> {
        let rows: Vec<SensorReadingRow> =
            mapper::fetch_all(&self.session, &self.select_by_location, (location,)).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
