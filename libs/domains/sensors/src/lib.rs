//! Sensors Domain
//!
//! IoT time series on a wide-column store: one partition per sensor, rows
//! clustered by timestamp (newest first), a secondary index on location.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Validation, multi-sensor queries
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Cassandra implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← SensorReading
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::cassandra::{CassandraConfig, CassandraContext};
//! use domain_sensors::{CassandraSensorRepository, SensorService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CassandraConfig::with_keyspace(vec!["127.0.0.1:9042"], "cassandra_demo");
//! let context = CassandraContext::connect(&config, None).await?;
//!
//! let repository = CassandraSensorRepository::init(context.session()).await?;
//! let service = SensorService::new(repository);
//! # Ok(())
//! # }
//! ```

pub mod cassandra;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use cassandra::CassandraSensorRepository;
pub use error::{SensorError, SensorResult};
pub use models::SensorReading;
pub use repository::SensorReadingRepository;
pub use service::SensorService;
