//! Cassandra implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::cassandra::decimal::{decimal_from_scaled, scaled_from_decimal};
use database::cassandra::{
    apply_schema, mapper, BigDecimal, CassandraSession, PreparedStatement,
};
use scylla::{DeserializeRow, SerializeRow};
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;
use crate::repository::ProductRepository;

/// Prices are stored with two fractional digits
const PRICE_SCALE: i64 = 2;

pub const TABLE: &str = "products";

pub const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id uuid,
    category text,
    name text,
    description text,
    price decimal,
    stock_level int,
    last_updated timestamp,
    attributes map<text, text>,
    PRIMARY KEY ((category), id)
)
"#;

pub const CREATE_NAME_INDEX: &str = "CREATE INDEX IF NOT EXISTS ON products (name)";

const COLUMNS: &str =
    "id, category, name, description, price, stock_level, last_updated, attributes";

/// Row layout of `products`
///
/// Regular columns may be null when a row was only partially written.
#[derive(Debug, DeserializeRow)]
struct ProductRow {
    id: Uuid,
    category: String,
    name: Option<String>,
    description: Option<String>,
    price: Option<BigDecimal>,
    stock_level: Option<i32>,
    last_updated: Option<DateTime<Utc>>,
    attributes: Option<BTreeMap<String, String>>,
}

#[derive(Debug, SerializeRow)]
struct InsertProductRow {
    id: Uuid,
    category: String,
    name: String,
    description: String,
    price: BigDecimal,
    stock_level: i32,
    last_updated: DateTime<Utc>,
    attributes: BTreeMap<String, String>,
}

impl From<Product> for InsertProductRow {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            category: product.category,
            name: product.name,
            description: product.description,
            price: decimal_from_scaled(product.price_cents, PRICE_SCALE),
            stock_level: product.stock_level,
            last_updated: product.last_updated,
            attributes: product.attributes,
        }
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = ProductError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price_cents = match row.price {
            Some(price) => scaled_from_decimal(&price, PRICE_SCALE).ok_or_else(|| {
                ProductError::Database(format!(
                    "price of product {} is not representable in cents",
                    row.id
                ))
            })?,
            None => 0,
        };

        Ok(Self {
            id: row.id,
            category: row.category,
            name: row.name.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            price_cents,
            stock_level: row.stock_level.unwrap_or_default(),
            last_updated: row.last_updated.unwrap_or_default(),
            attributes: row.attributes.unwrap_or_default(),
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> ProductResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Cassandra implementation of the ProductRepository
pub struct CassandraProductRepository {
    session: CassandraSession,
    upsert: PreparedStatement,
    select_by_id: PreparedStatement,
    select_by_category: PreparedStatement,
    select_all: PreparedStatement,
    update_stock: PreparedStatement,
    delete: PreparedStatement,
}

impl CassandraProductRepository {
    /// Create the table and index if needed, then prepare every statement
    pub async fn init(session: CassandraSession) -> ProductResult<Self> {
        apply_schema(&session, TABLE, &[CREATE_TABLE, CREATE_NAME_INDEX]).await?;

        let upsert = format!(
            "INSERT INTO products ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            COLUMNS
        );
        // id is a clustering column, so a lookup without the category filters
        let select_by_id = format!(
            "SELECT {} FROM products WHERE id = ? ALLOW FILTERING",
            COLUMNS
        );
        let select_by_category = format!("SELECT {} FROM products WHERE category = ?", COLUMNS);
        let select_all = format!("SELECT {} FROM products", COLUMNS);

        Ok(Self {
            upsert: mapper::prepare(&session, &upsert).await?,
            select_by_id: mapper::prepare(&session, &select_by_id).await?,
            select_by_category: mapper::prepare(&session, &select_by_category).await?,
            select_all: mapper::prepare(&session, &select_all).await?,
            update_stock: mapper::prepare(
                &session,
                "UPDATE products SET stock_level = ?, last_updated = ? \
                 WHERE category = ? AND id = ?",
            )
            .await?,
            delete: mapper::prepare(
                &session,
                "DELETE FROM products WHERE category = ? AND id = ?",
            )
            .await?,
            session,
        })
    }
}

#[async_trait]
impl ProductRepository for CassandraProductRepository {
    #[instrument(
        skip(self, product),
        fields(product_id = %product.id, category = %product.category)
    )]
    async fn upsert(&self, product: Product) -> ProductResult<()> {
        let row = InsertProductRow::from(product);
        mapper::execute(&self.session, &self.upsert, row).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let row: Option<ProductRow> =
            mapper::fetch_optional(&self.session, &self.select_by_id, (id,)).await?;
        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn get_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        let rows: Vec<ProductRow> =
            mapper::fetch_all(&self.session, &self.select_by_category, (category,)).await?;
        into_products(rows)
    }

    // LIKE needs SASI/SAI indexes, which differ between Cassandra and
    // ScyllaDB; match on the client while paging through the table.
    #[instrument(skip(self))]
    async fn search_by_name(&self, pattern: &str) -> ProductResult<Vec<Product>> {
        let needle = pattern.to_lowercase();
        let rows: Vec<ProductRow> =
            mapper::scan_filtered(&self.session, &self.select_all, (), |row: &ProductRow| {
                row.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .await?;

        debug!(matches = rows.len(), "Product name scan finished");
        into_products(rows)
    }

    #[instrument(skip(self))]
    async fn update_stock_level(
        &self,
        category: &str,
        id: Uuid,
        stock_level: i32,
        updated_at: DateTime<Utc>,
    ) -> ProductResult<()> {
        mapper::execute(
            &self.session,
            &self.update_stock,
            (stock_level, updated_at, category, id),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, category: &str, id: Uuid) -> ProductResult<()> {
        mapper::execute(&self.session, &self.delete, (category, id)).await?;
        Ok(())
    }
}
