use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::Order;

/// Repository trait for Order persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All orders, most recent order_date first
    async fn list(&self) -> OrderResult<Vec<Order>>;

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>>;

    async fn get_by_number(&self, order_number: &str) -> OrderResult<Option<Order>>;

    async fn create(&self, order: Order) -> OrderResult<Order>;

    async fn update(&self, order: Order) -> OrderResult<Order>;

    async fn delete(&self, id: Uuid) -> OrderResult<bool>;
}

/// In-memory implementation of OrderRepository (for development/testing)
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn list(&self) -> OrderResult<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut result: Vec<Order> = orders.values().cloned().collect();
        result.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
        Ok(result)
    }

    async fn get_by_id(&self, id: Uuid) -> OrderResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(&id).cloned())
    }

    async fn get_by_number(&self, order_number: &str) -> OrderResult<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .find(|o| o.order_number == order_number)
            .cloned())
    }

    async fn create(&self, order: Order) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;

        if orders.values().any(|o| o.order_number == order.order_number) {
            return Err(OrderError::DuplicateNumber(order.order_number));
        }

        orders.insert(order.id, order.clone());
        tracing::info!(order_id = %order.id, order_number = %order.order_number, "Created order");
        Ok(order)
    }

    async fn update(&self, order: Order) -> OrderResult<Order> {
        let mut orders = self.orders.write().await;

        if !orders.contains_key(&order.id) {
            return Err(OrderError::NotFound);
        }
        if orders
            .values()
            .any(|o| o.id != order.id && o.order_number == order.order_number)
        {
            return Err(OrderError::DuplicateNumber(order.order_number));
        }

        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn delete(&self, id: Uuid) -> OrderResult<bool> {
        let mut orders = self.orders.write().await;
        Ok(orders.remove(&id).is_some())
    }
}
