//! Cassandra implementation of UserSessionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::cassandra::{apply_schema, mapper, CassandraSession, PreparedStatement};
use scylla::DeserializeRow;
use std::collections::BTreeMap;
use tracing::instrument;
use uuid::Uuid;

use crate::error::SessionResult;
use crate::models::{UserSession, DEFAULT_TTL_SECONDS};
use crate::repository::UserSessionRepository;

pub const TABLE: &str = "user_sessions";

pub const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS user_sessions (
    session_id uuid,
    user_id uuid,
    username text,
    login_time timestamp,
    last_activity timestamp,
    ip_address text,
    device_info text,
    permissions map<text, boolean>,
    PRIMARY KEY (session_id)
) WITH default_time_to_live = 86400
"#;

const INSERT: &str = "INSERT INTO user_sessions \
    (session_id, user_id, username, login_time, last_activity, \
    ip_address, device_info, permissions) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?) USING TTL ?";

// remaining TTL is read from a column only the INSERT writes
const SELECT: &str = "SELECT session_id, user_id, username, login_time, last_activity, \
    ip_address, device_info, permissions, TTL(username) AS ttl_remaining \
    FROM user_sessions WHERE session_id = ?";

const TOUCH: &str =
    "UPDATE user_sessions USING TTL ? SET last_activity = ? WHERE session_id = ?";

const DELETE: &str = "DELETE FROM user_sessions WHERE session_id = ?";

#[derive(Debug, DeserializeRow)]
struct UserSessionRow {
    session_id: Uuid,
    user_id: Option<Uuid>,
    username: Option<String>,
    login_time: Option<DateTime<Utc>>,
    last_activity: Option<DateTime<Utc>>,
    ip_address: Option<String>,
    device_info: Option<String>,
    permissions: Option<BTreeMap<String, bool>>,
    ttl_remaining: Option<i32>,
}

impl From<UserSessionRow> for UserSession {
    fn from(row: UserSessionRow) -> Self {
        let login_time = row.login_time.unwrap_or_default();
        Self {
            session_id: row.session_id,
            user_id: row.user_id.unwrap_or_default(),
            username: row.username.unwrap_or_default(),
            login_time,
            last_activity: row.last_activity.unwrap_or(login_time),
            ip_address: row.ip_address.unwrap_or_default(),
            device_info: row.device_info.unwrap_or_default(),
            permissions: row.permissions.unwrap_or_default(),
            ttl_seconds: row.ttl_remaining.unwrap_or(DEFAULT_TTL_SECONDS),
        }
    }
}

/// Cassandra implementation of the UserSessionRepository
pub struct CassandraSessionRepository {
    session: CassandraSession,
    insert: PreparedStatement,
    select: PreparedStatement,
    touch: PreparedStatement,
    delete: PreparedStatement,
}

impl CassandraSessionRepository {
    /// Create the table if needed, then prepare every statement
    pub async fn init(session: CassandraSession) -> SessionResult<Self> {
        apply_schema(&session, TABLE, &[CREATE_TABLE]).await?;

        Ok(Self {
            insert: mapper::prepare(&session, INSERT).await?,
            select: mapper::prepare(&session, SELECT).await?,
            touch: mapper::prepare(&session, TOUCH).await?,
            delete: mapper::prepare(&session, DELETE).await?,
            session,
        })
    }
}

#[async_trait]
impl UserSessionRepository for CassandraSessionRepository {
    #[instrument(
        skip(self, user_session),
        fields(session_id = %user_session.session_id, ttl = user_session.ttl_seconds)
    )]
    async fn create(&self, user_session: UserSession) -> SessionResult<()> {
        // USING TTL has no column name, so values are bound by position
        let values = (
            user_session.session_id,
            user_session.user_id,
            user_session.username,
            user_session.login_time,
            user_session.last_activity,
            user_session.ip_address,
            user_session.device_info,
            user_session.permissions,
            user_session.ttl_seconds,
        );
        mapper::execute(&self.session, &self.insert, values).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, session_id: Uuid) -> SessionResult<Option<UserSession>> {
        let row: Option<UserSessionRow> =
            mapper::fetch_optional(&self.session, &self.select, (session_id,)).await?;
        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn touch(
        &self,
        session_id: Uuid,
        at: DateTime<Utc>,
        ttl_seconds: i32,
    ) -> SessionResult<()> {
        mapper::execute(&self.session, &self.touch, (ttl_seconds, at, session_id)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, session_id: Uuid) -> SessionResult<()> {
        mapper::execute(&self.session, &self.delete, (session_id,)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_defaults() {
        let id = Uuid::new_v4();
        let login = Utc::now();
        let row = UserSessionRow {
            session_id: id,
            user_id: None,
            username: Some("alice".to_string()),
            login_time: Some(login),
            last_activity: None,
            ip_address: None,
            device_info: None,
            permissions: None,
            ttl_remaining: Some(3_599),
        };

        let session = UserSession::from(row);
        assert_eq!(session.session_id, id);
        assert_eq!(session.last_activity, login);
        assert_eq!(session.ttl_seconds, 3_599);
        assert!(session.permissions.is_empty());
    }

    #[test]
    fn test_insert_binds_ttl_last() {
        assert!(INSERT.trim_end().ends_with("USING TTL ?"));
        assert_eq!(INSERT.matches('?').count(), 9);
    }
}
