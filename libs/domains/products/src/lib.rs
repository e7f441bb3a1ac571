//! Products Domain
//!
//! This module provides a product catalog on Cassandra, partitioned by
//! category.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Business logic, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Cassandra implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::cassandra::{CassandraConfig, CassandraContext};
//! use domain_products::{CassandraProductRepository, NewProduct, ProductService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CassandraConfig::with_keyspace(vec!["127.0.0.1:9042"], "cassandra_demo");
//! let context = CassandraContext::connect(&config, None).await?;
//!
//! // Create a repository and service
//! let repository = CassandraProductRepository::init(context.session()).await?;
//! let service = ProductService::new(repository);
//!
//! let laptop = service
//!     .upsert_product(NewProduct::new("Electronics", "Laptop Pro", 129_999).with_stock(50))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod cassandra;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use cassandra::CassandraProductRepository;
pub use error::{ProductError, ProductResult};
pub use models::{NewProduct, Product};
pub use repository::ProductRepository;
pub use service::ProductService;
