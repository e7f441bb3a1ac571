use database::CassandraError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Message {timestamp} not found in conversation {conversation_id}")]
    NotFound { conversation_id: Uuid, timestamp: Uuid },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type MessageResult<T> = Result<T, MessageError>;

impl From<CassandraError> for MessageError {
    fn from(err: CassandraError) -> Self {
        MessageError::Database(err.to_string())
    }
}

impl From<validator::ValidationErrors> for MessageError {
    fn from(err: validator::ValidationErrors) -> Self {
        MessageError::Validation(err.to_string())
    }
}
