use chrono::{DateTime, Utc};
use database::cassandra::PageToken;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// Kind of payload a message carries
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    Video,
    Audio,
    File,
}

/// A message in a conversation
///
/// `timestamp` is a version-1 time-uuid: it orders messages inside the
/// conversation partition and identifies the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub conversation_id: Uuid,
    pub timestamp: Uuid,
    pub sender_id: Uuid,
    pub message_type: MessageType,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Per-user read flag; users missing from the map were never addressed
    #[serde(default)]
    pub read_status: HashMap<Uuid, bool>,
}

impl Message {
    /// Wall-clock time embedded in the time-uuid
    pub fn sent_at(&self) -> Option<DateTime<Utc>> {
        let (seconds, nanos) = self.timestamp.get_timestamp()?.to_unix();
        DateTime::from_timestamp(i64::try_from(seconds).ok()?, nanos)
    }

    pub fn is_read_by(&self, user_id: Uuid) -> bool {
        self.read_status.get(&user_id).copied().unwrap_or(false)
    }

    /// True only when the user is explicitly listed as not having read it
    pub fn is_unread_by(&self, user_id: Uuid) -> bool {
        self.read_status.get(&user_id) == Some(&false)
    }
}

/// DTO for sending a message
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    #[serde(default)]
    pub message_type: MessageType,
    #[validate(length(min = 1, max = 4000))]
    pub content: String,
    #[validate(length(max = 10))]
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Participants that start out with the message unread
    #[serde(default)]
    pub recipients: Vec<Uuid>,
}

impl NewMessage {
    pub fn text(conversation_id: Uuid, sender_id: Uuid, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            sender_id,
            message_type: MessageType::Text,
            content: content.into(),
            attachments: Vec::new(),
            recipients: Vec::new(),
        }
    }

    pub fn with_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    pub fn with_attachment(mut self, url: impl Into<String>) -> Self {
        self.attachments.push(url.into());
        self
    }

    pub fn to_recipients(mut self, recipients: impl IntoIterator<Item = Uuid>) -> Self {
        self.recipients.extend(recipients);
        self
    }

    /// Recipients start unread; the sender has always read their own message
    pub fn initial_read_status(&self) -> HashMap<Uuid, bool> {
        let mut status: HashMap<Uuid, bool> =
            self.recipients.iter().map(|id| (*id, false)).collect();
        status.insert(self.sender_id, true);
        status
    }
}

/// One page of a conversation, newest first
#[derive(Debug, Clone, Default)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    /// Token for the next page, `None` on the last page
    pub next_page: Option<PageToken>,
}

impl MessagePage {
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }
}
