//! Session Service - login, activity tracking, logout

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{SessionError, SessionResult};
use crate::models::{NewSession, UserSession, MAX_TTL_SECONDS};
use crate::repository::UserSessionRepository;

pub struct SessionService<R: UserSessionRepository> {
    repository: Arc<R>,
}

impl<R: UserSessionRepository> SessionService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Start a session for a user
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: NewSession) -> SessionResult<UserSession> {
        input.validate()?;

        let session = UserSession::start(input, Utc::now());
        self.repository.create(session.clone()).await?;

        info!(session_id = %session.session_id, ttl = session.ttl_seconds, "Session created");
        Ok(session)
    }

    #[instrument(skip(self))]
    pub async fn get_session(&self, session_id: Uuid) -> SessionResult<UserSession> {
        self.repository
            .get(session_id)
            .await?
            .ok_or(SessionError::NotFound(session_id))
    }

    /// Like `get_session`, but absence (logout or expiry) is not an error
    #[instrument(skip(self))]
    pub async fn find_session(&self, session_id: Uuid) -> SessionResult<Option<UserSession>> {
        self.repository.get(session_id).await
    }

    /// Bump `last_activity`, keeping the expiry the session already has
    #[instrument(skip(self))]
    pub async fn record_activity(&self, session_id: Uuid) -> SessionResult<UserSession> {
        let mut session = self.get_session(session_id).await?;
        let now = Utc::now();

        // ttl_seconds holds what is left, so the column expires with the row
        self.repository
            .touch(session_id, now, session.ttl_seconds.max(1))
            .await?;

        session.last_activity = now;
        Ok(session)
    }

    /// Bump `last_activity` and restart the whole session on a new TTL
    #[instrument(skip(self))]
    pub async fn refresh(
        &self,
        session_id: Uuid,
        ttl_seconds: i32,
    ) -> SessionResult<UserSession> {
        if !(1..=MAX_TTL_SECONDS).contains(&ttl_seconds) {
            return Err(SessionError::Validation(format!(
                "ttl must be between 1 and {} seconds, got {}",
                MAX_TTL_SECONDS, ttl_seconds
            )));
        }

        let mut session = self.get_session(session_id).await?;
        session.last_activity = Utc::now();
        session.ttl_seconds = ttl_seconds;

        // every column gets the new TTL, not just last_activity
        self.repository.create(session.clone()).await?;
        Ok(session)
    }

    /// End a session; logging out twice is not an error
    #[instrument(skip(self))]
    pub async fn logout(&self, session_id: Uuid) -> SessionResult<()> {
        self.repository.delete(session_id).await?;
        info!(session_id = %session_id, "Session ended");
        Ok(())
    }

    pub fn has_permission(&self, session: &UserSession, permission: &str) -> bool {
        session.has_permission(permission)
    }
}

impl<R: UserSessionRepository> Clone for SessionService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
