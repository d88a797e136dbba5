//! Order Service - order number uniqueness and totals

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{OrderError, OrderResult};
use crate::models::{CreateOrder, Order, UpdateOrder};
use crate::repository::OrderRepository;

pub struct OrderService<R: OrderRepository> {
    repository: Arc<R>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> OrderResult<Vec<Order>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: Uuid) -> OrderResult<Order> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)
    }

    /// Totals are derived from the items by `Order::new`
    #[instrument(skip(self, input), fields(order_number = %input.order_number))]
    pub async fn create_order(&self, input: CreateOrder) -> OrderResult<Order> {
        let order = Order::new(input);

        if self
            .repository
            .get_by_number(&order.order_number)
            .await?
            .is_some()
        {
            return Err(OrderError::DuplicateNumber(order.order_number));
        }

        let order = self.repository.create(order).await?;
        tracing::info!(order_id = %order.id, total = order.total, "Order created");
        Ok(order)
    }

    #[instrument(skip(self, input))]
    pub async fn update_order(&self, id: Uuid, input: UpdateOrder) -> OrderResult<Order> {
        let mut order = self.get_order(id).await?;

        if let Some(ref number) = input.order_number {
            let number = number.trim();
            if number != order.order_number {
                if let Some(other) = self.repository.get_by_number(number).await? {
                    if other.id != id {
                        return Err(OrderError::DuplicateNumber(number.to_string()));
                    }
                }
            }
        }

        order.apply_update(input);
        let order = self.repository.update(order).await?;
        tracing::info!(order_id = %order.id, status = %order.status, "Order updated");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: Uuid) -> OrderResult<()> {
        if !self.repository.delete(id).await? {
            return Err(OrderError::NotFound);
        }
        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }
}
