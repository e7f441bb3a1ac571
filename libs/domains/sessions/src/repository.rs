use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::SessionResult;
use crate::models::UserSession;

/// Repository trait for TTL-bound user sessions
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSessionRepository: Send + Sync {
    /// Write the whole session row with its `ttl_seconds`
    async fn create(&self, session: UserSession) -> SessionResult<()>;

    /// Get a live session
    async fn get(&self, session_id: Uuid) -> SessionResult<Option<UserSession>>;

    /// Set `last_activity` with a fresh TTL on that column
    async fn touch(
        &self,
        session_id: Uuid,
        at: DateTime<Utc>,
        ttl_seconds: i32,
    ) -> SessionResult<()>;

    /// Remove a session
    async fn delete(&self, session_id: Uuid) -> SessionResult<()>;
}
