use database::CassandraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("No readings for sensor: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type SensorResult<T> = Result<T, SensorError>;

impl From<CassandraError> for SensorError {
    fn from(err: CassandraError) -> Self {
        SensorError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for SensorError {
    fn from(err: validator::ValidationErrors) -> Self {
        SensorError::Validation(err.to_string())
    }
}
