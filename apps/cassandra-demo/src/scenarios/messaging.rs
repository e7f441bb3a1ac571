//! Conversation messages clustered by time-uuid with per-user read state

use database::cassandra::CassandraContext;
use domain_messaging::{
    CassandraMessageRepository, Message, MessageService, MessageType, NewMessage,
};
use eyre::Result;
use std::time::Duration;
use uuid::Uuid;

const PAGE_SIZE: i32 = 10;
const SEND_INTERVAL: Duration = Duration::from_millis(100);
const PREVIEW_CHARS: usize = 20;

/// Four messages between three participants; everyone else starts unread
pub fn script(conversation_id: Uuid, users: &[Uuid; 3]) -> Vec<NewMessage> {
    let others = |sender: usize| -> Vec<Uuid> {
        users
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != sender)
            .map(|(_, id)| *id)
            .collect()
    };

    vec![
        NewMessage::text(
            conversation_id,
            users[0],
            "Hello team! How is everyone doing today?",
        )
        .to_recipients(others(0)),
        NewMessage::text(
            conversation_id,
            users[1],
            "Hi! I'm good, working on the Cassandra implementation.",
        )
        .to_recipients(others(1)),
        NewMessage::text(
            conversation_id,
            users[2],
            "Hello! I'm reviewing the data model. Check out this document:",
        )
        .with_attachment("https://example.com/document.pdf")
        .to_recipients(others(2)),
        NewMessage::text(
            conversation_id,
            users[0],
            "Here's a diagram of the architecture:",
        )
        .with_type(MessageType::Image)
        .with_attachment("https://example.com/architecture.png")
        .to_recipients(others(0)),
    ]
}

/// `User N` by position in the conversation, 1-based
pub fn user_label(users: &[Uuid; 3], id: Uuid) -> String {
    match users.iter().position(|u| *u == id) {
        Some(index) => format!("User {}", index + 1),
        None => "Unknown user".to_string(),
    }
}

pub fn preview(content: &str) -> String {
    let cut: String = content.chars().take(PREVIEW_CHARS).collect();
    if cut.len() < content.len() {
        format!("{}...", cut)
    } else {
        cut
    }
}

/// Read flags in participant order, e.g. `User 1: Read, User 2: Unread`
pub fn format_read_status(message: &Message, users: &[Uuid; 3]) -> String {
    users
        .iter()
        .filter_map(|id| {
            message.read_status.get(id).map(|read| {
                let state = if *read { "Read" } else { "Unread" };
                format!("{}: {}", user_label(users, *id), state)
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_message(message: &Message, users: &[Uuid; 3]) {
    println!("From: {}", user_label(users, message.sender_id));
    println!("Type: {}", message.message_type);
    println!("Content: {}", message.content);
    if !message.attachments.is_empty() {
        println!("Attachments: {}", message.attachments.join(", "));
    }
    println!("Read Status: {}", format_read_status(message, users));
    println!();
}

pub async fn run(context: &CassandraContext) -> Result<()> {
    let repository = CassandraMessageRepository::init(context.session()).await?;
    let service = MessageService::new(repository);

    let conversation_id = Uuid::new_v4();
    let users = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

    println!("Conversation ID: {}", conversation_id);
    println!("Users in conversation: {}", users.len());

    for input in script(conversation_id, &users) {
        let message = service.send_message(input).await?;
        println!(
            "Sent message: {} [{}]",
            preview(&message.content),
            message.message_type
        );
        // distinct, ordered time-uuids even on coarse clocks
        tokio::time::sleep(SEND_INTERVAL).await;
    }

    let page = service
        .conversation_page(conversation_id, PAGE_SIZE, None)
        .await?;
    println!("\nFound {} messages:", page.messages.len());
    for message in &page.messages {
        print_message(message, &users);
    }

    if let Some(newest) = page.messages.first() {
        service
            .mark_read(conversation_id, users[1], newest.timestamp)
            .await?;
        println!(
            "Marked message as read by User 2: \"{}\"",
            preview(&newest.content)
        );

        let refreshed = service.conversation_page(conversation_id, 1, None).await?;
        if let Some(updated) = refreshed.messages.first() {
            println!(
                "Updated Read Status: {}",
                format_read_status(updated, &users)
            );
        }
    }

    let marked = service.mark_all_read(conversation_id, users[2]).await?;
    println!("\nMarked {} messages as read for User 3", marked);

    println!("\nNote: partitioning by conversation_id lets this model scale to millions");
    println!("of conversations while each conversation stays a single ordered partition.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use validator::Validate;

    fn users() -> [Uuid; 3] {
        [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()]
    }

    #[test]
    fn test_script_shape() {
        let users = users();
        let conversation = Uuid::new_v4();
        let script = script(conversation, &users);

        assert_eq!(script.len(), 4);
        assert!(script.iter().all(|m| m.validate().is_ok()));
        assert!(script.iter().all(|m| m.conversation_id == conversation));
        assert_eq!(script[2].attachments.len(), 1);
        assert_eq!(script[2].message_type, MessageType::Text);
        assert_eq!(script[3].message_type, MessageType::Image);
    }

    #[test]
    fn test_script_recipients_exclude_sender() {
        let users = users();
        for message in script(Uuid::new_v4(), &users) {
            assert_eq!(message.recipients.len(), 2);
            assert!(!message.recipients.contains(&message.sender_id));

            let status = message.initial_read_status();
            assert_eq!(status.len(), 3);
            assert_eq!(status.get(&message.sender_id), Some(&true));
        }
    }

    #[test]
    fn test_user_label() {
        let users = users();
        assert_eq!(user_label(&users, users[0]), "User 1");
        assert_eq!(user_label(&users, users[2]), "User 3");
        assert_eq!(user_label(&users, Uuid::new_v4()), "Unknown user");
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short"), "short");
        assert_eq!(
            preview("Hello team! How is everyone doing today?"),
            "Hello team! How is e..."
        );
        assert_eq!(preview("ünïcödé ünïcödé ünïcödé"), "ünïcödé ünïcödé ünïc...");
    }

    #[test]
    fn test_format_read_status_in_participant_order() {
        let users = users();
        let message = Message {
            conversation_id: Uuid::new_v4(),
            timestamp: Uuid::now_v1(&[1, 2, 3, 4, 5, 6]),
            sender_id: users[1],
            message_type: MessageType::Text,
            content: "hi".to_string(),
            attachments: vec![],
            read_status: HashMap::from([(users[2], false), (users[1], true)]),
        };

        assert_eq!(
            format_read_status(&message, &users),
            "User 2: Read, User 3: Unread"
        );
    }
}
