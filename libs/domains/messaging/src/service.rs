//! Message Service - validation, time-uuid generation, read tracking

use chrono::{DateTime, Utc};
use database::cassandra::PageToken;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{MessageError, MessageResult};
use crate::models::{Message, MessagePage, NewMessage};
use crate::repository::MessageRepository;

pub const MAX_PAGE_SIZE: i32 = 1000;

pub struct MessageService<R: MessageRepository> {
    repository: Arc<R>,
    node_id: [u8; 6],
}

impl<R: MessageRepository> MessageService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_node_id(repository, random_node_id())
    }

    /// Use a fixed node id for the generated time-uuids
    pub fn with_node_id(repository: R, node_id: [u8; 6]) -> Self {
        Self {
            repository: Arc::new(repository),
            node_id,
        }
    }

    /// Validate and store a message, returning it with its time-uuid
    #[instrument(skip(self, input), fields(conversation_id = %input.conversation_id))]
    pub async fn send_message(&self, input: NewMessage) -> MessageResult<Message> {
        input.validate()?;
        if input.content.trim().is_empty() {
            return Err(MessageError::Validation(
                "content must not be blank".to_string(),
            ));
        }

        let read_status = input.initial_read_status();
        let message = Message {
            conversation_id: input.conversation_id,
            timestamp: Uuid::now_v1(&self.node_id),
            sender_id: input.sender_id,
            message_type: input.message_type,
            content: input.content,
            attachments: input.attachments,
            read_status,
        };

        self.repository.send(message.clone()).await?;
        Ok(message)
    }

    /// One page of a conversation, newest first
    #[instrument(skip(self, page))]
    pub async fn conversation_page(
        &self,
        conversation_id: Uuid,
        page_size: i32,
        page: Option<PageToken>,
    ) -> MessageResult<MessagePage> {
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(MessageError::Validation(format!(
                "page size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, page_size
            )));
        }
        self.repository
            .messages(conversation_id, page_size, page)
            .await
    }

    /// Mark one existing message as read
    #[instrument(skip(self))]
    pub async fn mark_read(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        timestamp: Uuid,
    ) -> MessageResult<()> {
        // an UPDATE on a missing key would create a stub row
        if self
            .repository
            .message(conversation_id, timestamp)
            .await?
            .is_none()
        {
            return Err(MessageError::NotFound {
                conversation_id,
                timestamp,
            });
        }

        self.repository
            .mark_read(conversation_id, user_id, timestamp)
            .await
    }

    #[instrument(skip(self))]
    pub async fn mark_all_read(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> MessageResult<usize> {
        self.repository.mark_all_read(conversation_id, user_id).await
    }

    /// Messages sent in `(after, until]`, newest first
    #[instrument(skip(self))]
    pub async fn messages_between(
        &self,
        conversation_id: Uuid,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: i32,
    ) -> MessageResult<Vec<Message>> {
        if after > until {
            return Err(MessageError::Validation(format!(
                "window start {} is after its end {}",
                after, until
            )));
        }
        if limit < 1 {
            return Err(MessageError::Validation(format!(
                "limit must be positive, got {}",
                limit
            )));
        }
        self.repository
            .messages_between(conversation_id, after, until, limit)
            .await
    }
}

impl<R: MessageRepository> Clone for MessageService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            node_id: self.node_id,
        }
    }
}

/// Random node id with the multicast bit set, as RFC 4122 asks for ids
/// that are not a real MAC address
fn random_node_id() -> [u8; 6] {
    let random = Uuid::new_v4();
    let mut node_id = [0u8; 6];
    node_id.copy_from_slice(&random.as_bytes()[10..16]);
    node_id[0] |= 0x01;
    node_id
}
