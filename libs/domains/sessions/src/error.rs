use database::CassandraError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type SessionResult<T> = Result<T, SessionError>;

impl From<CassandraError> for SessionError {
    fn from(err: CassandraError) -> Self {
        SessionError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for SessionError {
    fn from(err: validator::ValidationErrors) -> Self {
        SessionError::Validation(err.to_string())
    }
}
