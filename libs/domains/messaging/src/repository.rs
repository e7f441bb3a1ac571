use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::cassandra::PageToken;
use uuid::Uuid;

use crate::error::MessageResult;
use crate::models::{Message, MessagePage};

/// Repository trait for conversation messages
///
/// A conversation is one partition; messages are clustered by their
/// time-uuid, newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Store a message
    async fn send(&self, message: Message) -> MessageResult<()>;

    /// Fetch a single message by its full key
    async fn message(
        &self,
        conversation_id: Uuid,
        timestamp: Uuid,
    ) -> MessageResult<Option<Message>>;

    /// One page of a conversation; pass the previous page's token to continue
    async fn messages(
        &self,
        conversation_id: Uuid,
        page_size: i32,
        page: Option<PageToken>,
    ) -> MessageResult<MessagePage>;

    /// Mark one message as read by `user_id`
    async fn mark_read(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        timestamp: Uuid,
    ) -> MessageResult<()>;

    /// Messages sent in `(after, until]`, newest first, at most `limit`
    async fn messages_between(
        &self,
        conversation_id: Uuid,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: i32,
    ) -> MessageResult<Vec<Message>>;

    /// Mark every message `user_id` has not read; returns how many changed
    async fn mark_all_read(&self, conversation_id: Uuid, user_id: Uuid) -> MessageResult<usize>;
}
