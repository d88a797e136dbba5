//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use database::mongodb::uuid_as_bson;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFilter};
use crate::repository::ProductRepository;

/// MongoDB implementation of the ProductRepository
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Product>("products");
        Self { collection }
    }

    /// Initialize indexes for listing queries
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "category": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "brand": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_brand".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_as_bson(&id) }
    }

    /// Build a MongoDB filter document from ProductFilter
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref category) = filter.category {
            doc.insert("category", category);
        }

        if let Some(ref brand) = filter.brand {
            doc.insert("brand", brand);
        }

        if let Some(ref search) = filter.search {
            doc.insert(
                "name",
                doc! { "$regex": escape_regex(search), "$options": "i" },
            );
        }

        doc
    }
}

/// Match the search text literally
fn escape_regex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self))]
    async fn list(&self, filter: ProductFilter) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .limit(filter.limit)
            .skip(filter.offset)
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(&filter))
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let product = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_name = %product.name))]
    async fn create(&self, product: Product) -> ProductResult<Product> {
        self.collection.insert_one(&product).await?;

        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update(&self, product: Product) -> ProductResult<Product> {
        let result = self
            .collection
            .replace_one(Self::id_filter(product.id), &product)
            .await?;

        if result.matched_count == 0 {
            return Err(ProductError::NotFound);
        }

        tracing::info!("Product updated successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProduct;

    #[test]
    fn test_build_filter() {
        let filter = ProductFilter {
            category: Some("audio".to_string()),
            search: Some("a.b".to_string()),
            ..Default::default()
        };

        let doc = MongoProductRepository::build_filter(&filter);
        assert_eq!(doc.get_str("category").unwrap(), "audio");
        assert!(!doc.contains_key("brand"));
        let name = doc.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), "a\\.b");
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(MongoProductRepository::build_filter(&ProductFilter::default()).is_empty());
    }

    #[test]
    fn test_id_filter_matches_stored_id() {
        let product = Product::new(CreateProduct {
            name: "Headphones".to_string(),
            description: String::new(),
            price: 99.0,
            stock: 3,
            category: "audio".to_string(),
            brand: "Acme".to_string(),
            image_url: None,
        });

        let raw = mongodb::bson::to_raw_document_buf(&product).unwrap();
        let stored: Document = mongodb::bson::from_slice(raw.as_bytes()).unwrap();

        let filter = MongoProductRepository::id_filter(product.id);
        assert_eq!(filter.get("_id"), stored.get("_id"));
    }
}
