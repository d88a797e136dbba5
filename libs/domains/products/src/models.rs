use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Product entity - represents a product stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: i32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub stock: i32,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub category: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub brand: String,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// DTO for updating an existing product
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[validate(length(max = 100))]
    pub brand: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Query filters for listing products
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
pub struct ProductFilter {
    /// Filter by category (exact match)
    pub category: Option<String>,
    /// Filter by brand (exact match)
    pub brand: Option<String>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Number of results to skip
    #[serde(default)]
    pub offset: u64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            category: None,
            brand: None,
            search: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_limit() -> i64 {
    50
}

impl ProductFilter {
    /// In-process equivalent of the Mongo query built from this filter
    pub fn matches(&self, product: &Product) -> bool {
        self.category.as_ref().is_none_or(|c| &product.category == c)
            && self.brand.as_ref().is_none_or(|b| &product.brand == b)
            && self.search.as_ref().is_none_or(|s| {
                product.name.to_lowercase().contains(&s.to_lowercase())
            })
    }
}

impl Product {
    /// Create a new product from CreateProduct DTO
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            price: input.price,
            stock: input.stock,
            category: input.category,
            brand: input.brand,
            image_url: input.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the supplied fields; absent ones keep their value
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(brand) = update.brand {
            self.brand = brand;
        }
        if let Some(image_url) = update.image_url {
            self.image_url = Some(image_url);
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyboard() -> Product {
        Product::new(CreateProduct {
            name: "Mechanical Keyboard".to_string(),
            description: "Tactile switches".to_string(),
            price: 89.9,
            stock: 12,
            category: "peripherals".to_string(),
            brand: "Keyco".to_string(),
            image_url: None,
        })
    }

    #[test]
    fn test_apply_update_merges_fields() {
        let mut product = keyboard();
        product.apply_update(UpdateProduct {
            price: Some(79.9),
            stock: Some(0),
            ..Default::default()
        });

        assert_eq!(product.price, 79.9);
        assert_eq!(product.stock, 0);
        assert_eq!(product.name, "Mechanical Keyboard");
        assert_eq!(product.brand, "Keyco");
    }

    #[test]
    fn test_filter_matches() {
        let product = keyboard();

        assert!(ProductFilter::default().matches(&product));
        assert!(ProductFilter {
            search: Some("KEYBOARD".to_string()),
            category: Some("peripherals".to_string()),
            ..Default::default()
        }
        .matches(&product));
        assert!(!ProductFilter {
            brand: Some("Other".to_string()),
            ..Default::default()
        }
        .matches(&product));
    }

    #[test]
    fn test_negative_price_is_invalid() {
        let input = CreateProduct {
            name: "Broken".to_string(),
            description: String::new(),
            price: -1.0,
            stock: 0,
            category: String::new(),
            brand: String::new(),
            image_url: None,
        };
        assert!(input.validate().is_err());
    }
}
