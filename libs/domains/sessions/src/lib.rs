//! Sessions Domain
//!
//! User sessions keyed by session id and expired by the database through
//! TTLs (`USING TTL` per write, 24 h table default).
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::cassandra::{CassandraConfig, CassandraContext};
//! use domain_sessions::{CassandraSessionRepository, NewSession, SessionService};
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CassandraConfig::with_keyspace(vec!["127.0.0.1:9042"], "cassandra_demo");
//! let context = CassandraContext::connect(&config, None).await?;
//!
//! let repository = CassandraSessionRepository::init(context.session()).await?;
//! let service = SessionService::new(repository);
//!
//! let session = service
//!     .login(NewSession::new(Uuid::new_v4(), "alice", "192.168.1.100").with_ttl(3600))
//!     .await?;
//! service.logout(session.session_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod cassandra;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use cassandra::CassandraSessionRepository;
pub use error::{SessionError, SessionResult};
pub use models::{NewSession, UserSession, DEFAULT_TTL_SECONDS, MAX_TTL_SECONDS};
pub use repository::UserSessionRepository;
pub use service::SessionService;
