use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

/// Product entity - one row of the `products` table
///
/// Rows are partitioned by category, so a product is addressed by
/// `(category, id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub category: String,
    pub name: String,
    pub description: String,
    /// Price in cents (for precision)
    pub price_cents: i64,
    pub stock_level: i32,
    pub last_updated: DateTime<Utc>,
    /// Free-form attributes such as brand or color
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

/// DTO for creating or replacing a product
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewProduct {
    /// Existing id to overwrite; a fresh id is assigned when absent or nil
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in cents
    #[validate(range(min = 0))]
    pub price_cents: i64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock_level: i32,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl NewProduct {
    pub fn new(category: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            price_cents,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_stock(mut self, stock_level: i32) -> Self {
        self.stock_level = stock_level;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl Product {
    /// Build the stored entity, stamping `last_updated` with `now`
    pub fn from_new(input: NewProduct, now: DateTime<Utc>) -> Self {
        let id = match input.id {
            Some(id) if !id.is_nil() => id,
            _ => Uuid::now_v7(),
        };

        Self {
            id,
            category: input.category,
            name: input.name,
            description: input.description,
            price_cents: input.price_cents,
            stock_level: input.stock_level,
            last_updated: now,
            attributes: input.attributes,
        }
    }

    /// Price formatted as dollars, e.g. `899.99`
    pub fn display_price(&self) -> String {
        let sign = if self.price_cents < 0 { "-" } else { "" };
        let cents = self.price_cents.unsigned_abs();
        format!("{}{}.{:02}", sign, cents / 100, cents % 100)
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_level > 0
    }
}
