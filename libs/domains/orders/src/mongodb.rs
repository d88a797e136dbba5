//! MongoDB implementation of OrderRepository

use async_trait::async_trait;
use database::mongodb::{is_duplicate_key, uuid_as_bson};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::Order;
use crate::repository::OrderRepository;

pub struct MongoOrderRepository {
    collection: Collection<Order>,
}

impl MongoOrderRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Order>("orders");
        Self { collection }
    }

    pub async fn init_indexes(&self) -> OrderResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "order_number": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_order_number_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "status": 1, "order_date": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_status_order_date".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Order indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_as_bson(&id) }
    }
}

#[async_trait]
impl OrderRepository for MongoOrderRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> OrderResult<Vec<Order>> {
        let options = FindOptions::builder()
            .sort(doc! { "order_date": -1 })
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let orders: Vec<Order> = cursor.try_collect().await?;

        Ok(orders)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let order = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn get_by_number(&self, order_number: &str) -> OrderResult<Option<Order>> {
        let order = self
            .collection
            .find_one(doc! { "order_number": order_number })
            .await?;
        Ok(order)
    }

    #[instrument(skip(self, order), fields(order_number = %order.order_number))]
    async fn create(&self, order: Order) -> OrderResult<Order> {
        match self.collection.insert_one(&order).await {
            Ok(_) => {
                tracing::info!(order_id = %order.id, "Order created successfully");
                Ok(order)
            }
            Err(e) if is_duplicate_key(&e) => Err(OrderError::DuplicateNumber(order.order_number)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn update(&self, order: Order) -> OrderResult<Order> {
        let result = match self
            .collection
            .replace_one(Self::id_filter(order.id), &order)
            .await
        {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => {
                return Err(OrderError::DuplicateNumber(order.order_number));
            }
            Err(e) => return Err(e.into()),
        };

        if result.matched_count == 0 {
            return Err(OrderError::NotFound);
        }

        tracing::info!("Order updated successfully");
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> OrderResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateOrder, OrderItem, OrderStatus};

    #[test]
    fn test_id_filter_matches_stored_id() {
        let order = Order::new(CreateOrder {
            order_number: "ORD-1".to_string(),
            customer_name: "Ana".to_string(),
            customer_email: "ana@example.com".to_string(),
            items: vec![OrderItem {
                product_id: "p-1".to_string(),
                product_name: "Widget".to_string(),
                description: String::new(),
                quantity: 1,
                price: 4.0,
                discount: 0.0,
            }],
            status: OrderStatus::default(),
            order_date: None,
        });

        let raw = mongodb::bson::to_raw_document_buf(&order).unwrap();
        let stored: Document = mongodb::bson::from_slice(raw.as_bytes()).unwrap();

        let filter = MongoOrderRepository::id_filter(order.id);
        assert_eq!(filter.get("_id"), stored.get("_id"));
    }
}
