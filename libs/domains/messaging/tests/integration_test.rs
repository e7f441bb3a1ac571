//! Integration tests for the Messaging domain
//!
//! These tests run against a real ScyllaDB via testcontainers to check:
//! - Time-uuid clustering (newest first) and driver paging
//! - Read-status map updates, single and batched
//! - Time windows through maxTimeuuid

use chrono::{TimeDelta, Utc};
use domain_messaging::*;
use std::time::Duration;
use test_utils::{assertions::*, TestDataBuilder, TestScylla};

async fn setup(
    test_name: &str,
) -> (
    TestScylla,
    MessageService<CassandraMessageRepository>,
    TestDataBuilder,
) {
    let builder = TestDataBuilder::from_test_name(test_name);
    let scylla = TestScylla::new(&builder.keyspace()).await;
    let repo = CassandraMessageRepository::init(scylla.session())
        .await
        .unwrap();
    (scylla, MessageService::new(repo), builder)
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_send_and_page_newest_first() {
    let (_scylla, service, builder) = setup("send_and_page").await;
    let conversation = builder.uuid("conversation");
    let sender = builder.uuid("sender");

    for i in 0..5 {
        service
            .send_message(NewMessage::text(conversation, sender, format!("message {}", i)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let first = service
        .conversation_page(conversation, 2, None)
        .await
        .unwrap();
    assert_eq!(first.messages.len(), 2);
    assert_eq!(first.messages[0].content, "message 4");
    assert_descending_by(&first.messages, |m| m.sent_at(), "first page");
    let token = assert_some(first.next_page, "more pages after the first");

    let second = service
        .conversation_page(conversation, 2, Some(token))
        .await
        .unwrap();
    assert_eq!(second.messages[0].content, "message 2");

    let third = service
        .conversation_page(conversation, 2, second.next_page)
        .await
        .unwrap();
    assert_eq!(third.messages.len(), 1);
    assert_eq!(third.messages[0].content, "message 0");
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_empty_conversation_has_no_next_page() {
    let (_scylla, service, builder) = setup("empty_conversation").await;
    let page = service
        .conversation_page(builder.uuid("nobody"), 10, None)
        .await
        .unwrap();
    assert!(page.messages.is_empty());
    assert!(!page.has_more());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_attachments_and_type_round_trip() {
    let (_scylla, service, builder) = setup("attachments").await;
    let conversation = builder.uuid("conversation");

    let sent = service
        .send_message(
            NewMessage::text(conversation, builder.uuid("sender"), "Check this out")
                .with_type(MessageType::Image)
                .with_attachment("https://example.com/image.jpg"),
        )
        .await
        .unwrap();

    let page = service
        .conversation_page(conversation, 10, None)
        .await
        .unwrap();
    assert_eq!(page.messages, vec![sent]);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_mark_read_and_mark_all_read() {
    let (_scylla, service, builder) = setup("mark_read").await;
    let conversation = builder.uuid("conversation");
    let alice = builder.uuid("alice");
    let bob = builder.uuid("bob");
    let carol = builder.uuid("carol");

    let mut sent = Vec::new();
    for content in ["one", "two", "three"] {
        let message = service
            .send_message(NewMessage::text(conversation, alice, content).to_recipients([bob, carol]))
            .await
            .unwrap();
        sent.push(message);
    }

    service
        .mark_read(conversation, bob, sent[2].timestamp)
        .await
        .unwrap();
    assert_eq!(service.mark_all_read(conversation, bob).await.unwrap(), 2);
    assert_eq!(service.mark_all_read(conversation, bob).await.unwrap(), 0);

    // the sender never had anything unread
    assert_eq!(service.mark_all_read(conversation, alice).await.unwrap(), 0);

    let page = service
        .conversation_page(conversation, 10, None)
        .await
        .unwrap();
    assert!(page.messages.iter().all(|m| m.is_read_by(bob)));
    assert!(page.messages.iter().all(|m| m.is_unread_by(carol)));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_mark_read_unknown_message() {
    let (_scylla, service, builder) = setup("mark_read_unknown").await;
    let result = service
        .mark_read(
            builder.uuid("conversation"),
            builder.uuid("reader"),
            uuid::Uuid::now_v1(&[1, 2, 3, 4, 5, 6]),
        )
        .await;
    assert!(matches!(result, Err(MessageError::NotFound { .. })));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_messages_between_window() {
    let (_scylla, service, builder) = setup("between").await;
    let conversation = builder.uuid("conversation");
    let sender = builder.uuid("sender");

    let before = Utc::now() - TimeDelta::seconds(1);
    for content in ["a", "b", "c"] {
        service
            .send_message(NewMessage::text(conversation, sender, content))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let after_all = Utc::now() + TimeDelta::seconds(1);

    let all = service
        .messages_between(conversation, before, after_all, 100)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].content, "c");

    let limited = service
        .messages_between(conversation, before, after_all, 2)
        .await
        .unwrap();
    assert_eq!(limited.len(), 2);

    let none = service
        .messages_between(conversation, after_all, after_all + TimeDelta::hours(1), 10)
        .await
        .unwrap();
    assert!(none.is_empty());
}
