//! Messaging Domain
//!
//! Conversations stored one partition each, with messages clustered by a
//! version-1 time-uuid (newest first) and a per-user read-status map.
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::cassandra::{CassandraConfig, CassandraContext};
//! use domain_messaging::{CassandraMessageRepository, MessageService, NewMessage};
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CassandraConfig::with_keyspace(vec!["127.0.0.1:9042"], "cassandra_demo");
//! let context = CassandraContext::connect(&config, None).await?;
//!
//! let repository = CassandraMessageRepository::init(context.session()).await?;
//! let service = MessageService::new(repository);
//!
//! let (conversation, alice, bob) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
//! service
//!     .send_message(NewMessage::text(conversation, alice, "Hi Bob!").to_recipients([bob]))
//!     .await?;
//!
//! let page = service.conversation_page(conversation, 10, None).await?;
//! # Ok(())
//! # }
//! ```

pub mod cassandra;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use cassandra::CassandraMessageRepository;
pub use error::{MessageError, MessageResult};
pub use models::{Message, MessagePage, MessageType, NewMessage};
pub use repository::MessageRepository;
pub use service::MessageService;
