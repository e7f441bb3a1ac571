//! Database library providing the Cassandra/ScyllaDB connection layer for the demo
//!
//! Everything here is a thin layer over the `scylla` driver: connection setup,
//! keyspace bootstrap, idempotent schema application, typed row mapping and
//! health checks. Query execution, paging and pooling are the driver's job.
//!
//! # Features
//!
//! - `cassandra` (default) - Cassandra/ScyllaDB support via the `scylla` driver
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```ignore
//! use database::cassandra::{CassandraConfig, CassandraContext};
//!
//! let config = CassandraConfig::with_keyspace(vec!["127.0.0.1:9042"], "cassandra_demo")
//!     .with_datacenter("datacenter1");
//! let context = CassandraContext::connect(&config, None).await?;
//! context.execute_cql("SELECT now() FROM system.local").await?;
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "cassandra")]
pub mod cassandra;

// Re-exports for convenience
pub use common::{RetryConfig, retry, retry_with_backoff};

#[cfg(feature = "cassandra")]
pub use cassandra::{CassandraError, CassandraResult};
