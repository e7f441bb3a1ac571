//! Cassandra/ScyllaDB connector and utilities
//!
//! Uses the `scylla` driver which is compatible with both Apache Cassandra
//! and ScyllaDB.
//!
//! # Example
//!
//! ```ignore
//! use database::cassandra::{CassandraConfig, CassandraContext, mapper};
//!
//! let config = CassandraConfig::with_keyspace(vec!["127.0.0.1:9042"], "cassandra_demo")
//!     .with_datacenter("datacenter1");
//! let context = CassandraContext::connect(&config, None).await?;
//!
//! let session = context.session();
//! let select = mapper::prepare(&session, "SELECT id, name FROM users WHERE id = ?").await?;
//! let user: Option<(Uuid, String)> = mapper::fetch_optional(&session, &select, (id,)).await?;
//! ```

mod config;
mod connector;
mod context;
pub mod decimal;
mod health;
pub mod mapper;
mod paging;
mod schema;

pub use config::CassandraConfig;
pub use connector::{
    CassandraError, CassandraResult, CassandraSession, connect, connect_from_config,
    connect_from_config_with_retry, connect_with_retry, create_keyspace_cql,
    create_keyspace_if_not_exists, use_keyspace, validate_keyspace_name,
};
pub use context::CassandraContext;
pub use health::{
    ClusterInfo, HealthStatus, check_health, check_health_detailed, get_cluster_info,
};
pub use paging::PageToken;
pub use schema::{apply_schema, ensure_idempotent};

// Re-export scylla types used by repositories
pub use scylla::client::session::Session;
pub use scylla::statement::batch::{Batch, BatchType};
pub use scylla::statement::prepared::PreparedStatement;
pub use bigdecimal::BigDecimal;
pub use scylla::value::CqlTimeuuid;
