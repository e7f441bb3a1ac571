use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

/// 24 hours
pub const DEFAULT_TTL_SECONDS: i32 = 86_400;

/// 30 days
pub const MAX_TTL_SECONDS: i32 = 2_592_000;

/// A login session; the row disappears once its TTL runs out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSession {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub login_time: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub ip_address: String,
    pub device_info: String,
    #[serde(default)]
    pub permissions: BTreeMap<String, bool>,
    /// TTL applied on write; on read, the seconds the row has left
    pub ttl_seconds: i32,
}

impl UserSession {
    /// Fresh session: new id, login and activity both at `now`
    pub fn start(input: NewSession, now: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            user_id: input.user_id,
            username: input.username,
            login_time: now,
            last_activity: now,
            ip_address: input.ip_address,
            device_info: input.device_info,
            permissions: input.permissions,
            ttl_seconds: input.ttl_seconds,
        }
    }

    /// Missing permissions are denied
    pub fn has_permission(&self, name: &str) -> bool {
        self.permissions.get(name).copied().unwrap_or(false)
    }

    /// When the row expires if nothing touches it again
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.last_activity + TimeDelta::seconds(i64::from(self.ttl_seconds))
    }
}

/// DTO for logging in
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSession {
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(ip)]
    pub ip_address: String,
    #[serde(default)]
    pub device_info: String,
    #[serde(default)]
    pub permissions: BTreeMap<String, bool>,
    #[validate(range(min = 1, max = 2_592_000))]
    #[serde(default = "default_ttl")]
    pub ttl_seconds: i32,
}

fn default_ttl() -> i32 {
    DEFAULT_TTL_SECONDS
}

impl NewSession {
    pub fn new(user_id: Uuid, username: impl Into<String>, ip_address: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            ip_address: ip_address.into(),
            device_info: String::new(),
            permissions: BTreeMap::new(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    pub fn with_device(mut self, device_info: impl Into<String>) -> Self {
        self.device_info = device_info.into();
        self
    }

    pub fn with_permission(mut self, name: impl Into<String>, granted: bool) -> Self {
        self.permissions.insert(name.into(), granted);
        self
    }

    pub fn with_ttl(mut self, ttl_seconds: i32) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }
}
