//! Cassandra implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::cassandra::{
    apply_schema, mapper, Batch, BatchType, CassandraSession, CqlTimeuuid, PageToken,
    PreparedStatement,
};
use scylla::{DeserializeRow, SerializeRow};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::{MessageError, MessageResult};
use crate::models::{Message, MessagePage, MessageType};
use crate::repository::MessageRepository;

pub const TABLE: &str = "messages";

pub const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    conversation_id uuid,
    timestamp timeuuid,
    sender_id uuid,
    message_type text,
    message_content text,
    attachments list<text>,
    read_status map<uuid, boolean>,
    PRIMARY KEY (conversation_id, timestamp)
) WITH CLUSTERING ORDER BY (timestamp DESC)
"#;

const COLUMNS: &str = concat!(
    "conversation_id, timestamp, sender_id, message_type, ",
    "message_content, attachments, read_status"
);

#[derive(Debug, DeserializeRow)]
struct MessageRow {
    conversation_id: Uuid,
    timestamp: CqlTimeuuid,
    sender_id: Option<Uuid>,
    message_type: Option<String>,
    message_content: Option<String>,
    attachments: Option<Vec<String>>,
    read_status: Option<HashMap<Uuid, bool>>,
}

#[derive(Debug, SerializeRow)]
struct InsertMessageRow {
    conversation_id: Uuid,
    timestamp: CqlTimeuuid,
    sender_id: Uuid,
    message_type: String,
    message_content: String,
    attachments: Vec<String>,
    read_status: HashMap<Uuid, bool>,
}

/// Only what `mark_all_read` needs to decide
#[derive(Debug, DeserializeRow)]
struct ReadStateRow {
    timestamp: CqlTimeuuid,
    read_status: Option<HashMap<Uuid, bool>>,
}

impl From<Message> for InsertMessageRow {
    fn from(message: Message) -> Self {
        Self {
            conversation_id: message.conversation_id,
            timestamp: CqlTimeuuid::from(message.timestamp),
            sender_id: message.sender_id,
            message_type: message.message_type.to_string(),
            message_content: message.content,
            attachments: message.attachments,
            read_status: message.read_status,
        }
    }
}

impl TryFrom<MessageRow> for Message {
    type Error = MessageError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let message_type = match row.message_type.as_deref() {
            Some(raw) => MessageType::from_str(raw).map_err(|_| {
                MessageError::Database(format!("unknown message type '{}'", raw))
            })?,
            None => MessageType::default(),
        };

        Ok(Self {
            conversation_id: row.conversation_id,
            timestamp: row.timestamp.into(),
            sender_id: row.sender_id.unwrap_or_default(),
            message_type,
            content: row.message_content.unwrap_or_default(),
            attachments: row.attachments.unwrap_or_default(),
            read_status: row.read_status.unwrap_or_default(),
        })
    }
}

fn into_messages(rows: Vec<MessageRow>) -> MessageResult<Vec<Message>> {
    rows.into_iter().map(Message::try_from).collect()
}

/// Cassandra implementation of the MessageRepository
pub struct CassandraMessageRepository {
    session: CassandraSession,
    insert: PreparedStatement,
    select_one: PreparedStatement,
    select_page: PreparedStatement,
    select_between: PreparedStatement,
    select_read_state: PreparedStatement,
    mark_read: PreparedStatement,
}

impl CassandraMessageRepository {
    /// Create the table if needed, then prepare every statement
    pub async fn init(session: CassandraSession) -> MessageResult<Self> {
        apply_schema(&session, TABLE, &[CREATE_TABLE]).await?;

        let insert = format!(
            "INSERT INTO messages ({}) VALUES (?, ?, ?, ?, ?, ?, ?)",
            COLUMNS
        );
        let select_one = format!(
            "SELECT {} FROM messages WHERE conversation_id = ? AND timestamp = ?",
            COLUMNS
        );
        let select_page = format!("SELECT {} FROM messages WHERE conversation_id = ?", COLUMNS);
        // start exclusive, end inclusive
        let select_between = format!(
            "SELECT {} FROM messages WHERE conversation_id = ? \
             AND timestamp > maxTimeuuid(?) AND timestamp <= maxTimeuuid(?) LIMIT ?",
            COLUMNS
        );

        Ok(Self {
            insert: mapper::prepare(&session, &insert).await?,
            select_one: mapper::prepare(&session, &select_one).await?,
            select_page: mapper::prepare(&session, &select_page).await?,
            select_between: mapper::prepare(&session, &select_between).await?,
            select_read_state: mapper::prepare(
                &session,
                "SELECT timestamp, read_status FROM messages WHERE conversation_id = ?",
            )
            .await?,
            mark_read: mapper::prepare(
                &session,
                "UPDATE messages SET read_status[?] = true \
                 WHERE conversation_id = ? AND timestamp = ?",
            )
            .await?,
            session,
        })
    }
}

#[async_trait]
impl MessageRepository for CassandraMessageRepository {
    #[instrument(
        skip(self, message),
        fields(
            conversation_id = %message.conversation_id,
            message_type = %message.message_type
        )
    )]
    async fn send(&self, message: Message) -> MessageResult<()> {
        let row = InsertMessageRow::from(message);
        mapper::execute(&self.session, &self.insert, row).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn message(
        &self,
        conversation_id: Uuid,
        timestamp: Uuid,
    ) -> MessageResult<Option<Message>> {
        let row: Option<MessageRow> = mapper::fetch_optional(
            &self.session,
            &self.select_one,
            (conversation_id, CqlTimeuuid::from(timestamp)),
        )
        .await?;
        row.map(Message::try_from).transpose()
    }

    #[instrument(skip(self, page))]
    async fn messages(
        &self,
        conversation_id: Uuid,
        page_size: i32,
        page: Option<PageToken>,
    ) -> MessageResult<MessagePage> {
        let mut statement = self.select_page.clone();
        statement.set_page_size(page_size);

        let (rows, next_page): (Vec<MessageRow>, _) =
            mapper::fetch_page(&self.session, &statement, (conversation_id,), page).await?;

        Ok(MessagePage {
            messages: into_messages(rows)?,
            next_page,
        })
    }

    #[instrument(skip(self))]
    async fn mark_read(
        &self,
        conversation_id: Uuid,
        user_id: Uuid,
        timestamp: Uuid,
    ) -> MessageResult<()> {
        mapper::execute(
            &self.session,
            &self.mark_read,
            (user_id, conversation_id, CqlTimeuuid::from(timestamp)),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn messages_between(
        &self,
        conversation_id: Uuid,
        after: DateTime<Utc>,
        until: DateTime<Utc>,
        limit: i32,
    ) -> MessageResult<Vec<Message>> {
        let rows: Vec<MessageRow> = mapper::fetch_all(
            &self.session,
            &self.select_between,
            (conversation_id, after, until, limit),
        )
        .await?;
        into_messages(rows)
    }

    #[instrument(skip(self))]
    async fn mark_all_read(&self, conversation_id: Uuid, user_id: Uuid) -> MessageResult<usize> {
        let unread: Vec<ReadStateRow> = mapper::scan_filtered(
            &self.session,
            &self.select_read_state,
            (conversation_id,),
            |row: &ReadStateRow| {
                row.read_status
                    .as_ref()
                    .is_some_and(|status| status.get(&user_id) == Some(&false))
            },
        )
        .await?;

        if unread.is_empty() {
            debug!("Nothing unread");
            return Ok(0);
        }

        let mut batch = Batch::new(BatchType::Logged);
        let mut values = Vec::with_capacity(unread.len());
        for row in &unread {
            batch.append_statement(self.mark_read.clone());
            values.push((user_id, conversation_id, row.timestamp));
        }

        mapper::execute_batch(&self.session, &batch, values).await?;

        info!(marked = unread.len(), "Messages marked as read");
        Ok(unread.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(message_type: Option<&str>) -> MessageRow {
        MessageRow {
            conversation_id: Uuid::new_v4(),
            timestamp: CqlTimeuuid::from(Uuid::now_v1(&[1, 2, 3, 4, 5, 6])),
            sender_id: Some(Uuid::new_v4()),
            message_type: message_type.map(str::to_string),
            message_content: Some("hello".to_string()),
            attachments: None,
            read_status: None,
        }
    }

    #[test]
    fn test_row_to_message() {
        let message = Message::try_from(row(Some("image"))).unwrap();
        assert_eq!(message.message_type, MessageType::Image);
        assert!(message.attachments.is_empty());
        assert!(message.read_status.is_empty());
        assert!(message.sent_at().is_some());
    }

    #[test]
    fn test_missing_type_defaults_to_text() {
        let message = Message::try_from(row(None)).unwrap();
        assert_eq!(message.message_type, MessageType::Text);
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let result = Message::try_from(row(Some("hologram")));
        assert!(matches!(result, Err(MessageError::Database(_))));
    }

    #[test]
    fn test_insert_row_stores_type_as_text() {
        let message = Message::try_from(row(Some("audio"))).unwrap();
        let insert = InsertMessageRow::from(message.clone());
        assert_eq!(insert.message_type, "audio");
        assert_eq!(Uuid::from(insert.timestamp), message.timestamp);
    }
}
