use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::ProductResult;
use crate::models::Product;

/// Repository trait for Product persistence
///
/// Writes address rows by the full primary key `(category, id)`; reads by id
/// alone have to filter across partitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert or overwrite a product
    async fn upsert(&self, product: Product) -> ProductResult<()>;

    /// Get a product by ID
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Get every product of a category (single partition)
    async fn get_by_category(&self, category: &str) -> ProductResult<Vec<Product>>;

    /// Products whose name contains `pattern`, ignoring case
    async fn search_by_name(&self, pattern: &str) -> ProductResult<Vec<Product>>;

    /// Set the stock level of an existing product
    async fn update_stock_level(
        &self,
        category: &str,
        id: Uuid,
        stock_level: i32,
        updated_at: DateTime<Utc>,
    ) -> ProductResult<()>;

    /// Delete a product
    async fn delete(&self, category: &str, id: Uuid) -> ProductResult<()>;
}
