//! Product Service - Business logic layer

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product};
use crate::repository::ProductRepository;

/// Product service providing business logic operations
///
/// The service layer handles validation, business rules, and orchestrates
/// repository operations.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create or overwrite a product
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn upsert_product(&self, input: NewProduct) -> ProductResult<Product> {
        input.validate()?;

        let product = Product::from_new(input, Utc::now());
        self.repository.upsert(product.clone()).await?;
        Ok(product)
    }

    /// Get a product by ID
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        self.repository.get_by_category(category).await
    }

    /// Case-insensitive name search
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> ProductResult<Vec<Product>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(ProductError::Validation(
                "search term must not be blank".to_string(),
            ));
        }
        self.repository.search_by_name(term).await
    }

    /// Set an absolute stock level
    #[instrument(skip(self))]
    pub async fn set_stock_level(&self, id: Uuid, stock_level: i32) -> ProductResult<Product> {
        if stock_level < 0 {
            return Err(ProductError::Validation(format!(
                "stock level must not be negative, got {}",
                stock_level
            )));
        }

        let product = self.get_product(id).await?;
        self.write_stock(product, stock_level).await
    }

    /// Add (positive) or remove (negative) stock
    #[instrument(skip(self))]
    pub async fn adjust_stock(&self, id: Uuid, delta: i32) -> ProductResult<Product> {
        let product = self.get_product(id).await?;

        let new_level = product
            .stock_level
            .checked_add(delta)
            .filter(|level| *level >= 0)
            .ok_or(ProductError::InsufficientStock {
                available: product.stock_level,
                requested: delta.saturating_neg(),
            })?;

        self.write_stock(product, new_level).await
    }

    /// Delete a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        let product = self.get_product(id).await?;
        self.repository.delete(&product.category, id).await
    }

    async fn write_stock(&self, mut product: Product, stock_level: i32) -> ProductResult<Product> {
        let now = Utc::now();
        self.repository
            .update_stock_level(&product.category, product.id, stock_level, now)
            .await?;

        info!(
            product_id = %product.id,
            old = product.stock_level,
            new = stock_level,
            "Stock level updated"
        );

        product.stock_level = stock_level;
        product.last_updated = now;
        Ok(product)
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use mockall::predicate::{always, eq};

    fn stored(stock_level: i32) -> Product {
        let input = NewProduct::new("Electronics", "Laptop Pro", 129_999).with_stock(stock_level);
        Product::from_new(input, Utc::now())
    }

    #[tokio::test]
    async fn test_upsert_assigns_id_and_timestamp() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_upsert()
            .withf(|p| !p.id.is_nil() && p.name == "Desk Lamp")
            .times(1)
            .returning(|_| Ok(()));

        let service = ProductService::new(mock_repo);
        let before = Utc::now();
        let product = service
            .upsert_product(NewProduct::new("Home", "Desk Lamp", 2_999).with_stock(12))
            .await
            .unwrap();

        assert!(!product.id.is_nil());
        assert!(product.last_updated >= before);
        assert_eq!(product.stock_level, 12);
    }

    #[tokio::test]
    async fn test_upsert_rejects_negative_price() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_upsert().never();

        let service = ProductService::new(mock_repo);
        let result = service
            .upsert_product(NewProduct::new("Home", "Broken", -1))
            .await;
        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut mock_repo = MockProductRepository::new();
        let id = Uuid::now_v7();
        mock_repo
            .expect_get_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service.get_product(id).await;
        assert!(matches!(result, Err(ProductError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_search_rejects_blank_term() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_search_by_name().never();

        let service = ProductService::new(mock_repo);
        assert!(service.search("   ").await.is_err());
    }

    #[tokio::test]
    async fn test_search_trims_term() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_search_by_name()
            .with(eq("Pro"))
            .returning(|_| Ok(vec![stored(3)]));

        let service = ProductService::new(mock_repo);
        let found = service.search(" Pro ").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_adjust_stock_decrease() {
        let product = stored(10);
        let id = product.id;

        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        mock_repo
            .expect_update_stock_level()
            .with(eq("Electronics"), eq(id), eq(5), always())
            .times(1)
            .returning(|_, _, _, _| Ok(()));

        let service = ProductService::new(mock_repo);
        let updated = service.adjust_stock(id, -5).await.unwrap();
        assert_eq!(updated.stock_level, 5);
    }

    #[tokio::test]
    async fn test_adjust_stock_insufficient() {
        let product = stored(3);
        let id = product.id;

        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        mock_repo.expect_update_stock_level().never();

        let service = ProductService::new(mock_repo);
        let result = service.adjust_stock(id, -5).await;
        assert!(matches!(
            result,
            Err(ProductError::InsufficientStock {
                available: 3,
                requested: 5
            })
        ));
    }

    #[tokio::test]
    async fn test_set_stock_level_rejects_negative() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().never();

        let service = ProductService::new(mock_repo);
        let result = service.set_stock_level(Uuid::now_v7(), -1).await;
        assert!(matches!(result, Err(ProductError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_stock_level_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));
        mock_repo.expect_update_stock_level().never();

        let service = ProductService::new(mock_repo);
        let result = service.set_stock_level(Uuid::now_v7(), 4).await;
        assert!(matches!(result, Err(ProductError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_uses_stored_category() {
        let mut product = stored(1);
        product.category = "Books".to_string();
        let id = product.id;

        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        mock_repo
            .expect_delete()
            .with(eq("Books"), eq(id))
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ProductService::new(mock_repo);
        service.delete_product(id).await.unwrap();
    }
}
