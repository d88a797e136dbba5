use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Order lifecycle status
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// A line of an order. Product fields are copied, not referenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItem {
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
    /// Unit price
    #[validate(range(min = 0.0))]
    pub price: f64,
    /// Absolute discount for the whole line
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub discount: f64,
}

/// Amounts derived from the items
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub total_discount: f64,
    pub total: f64,
}

impl OrderTotals {
    pub fn from_items(items: &[OrderItem]) -> Self {
        let subtotal: f64 = items.iter().map(|i| i.price * f64::from(i.quantity)).sum();
        let total_discount: f64 = items.iter().map(|i| i.discount).sum();
        Self {
            subtotal,
            total_discount,
            total: (subtotal - total_discount).max(0.0),
        }
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Unique, caller supplied
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub total_discount: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(input: CreateOrder) -> Self {
        let now = Utc::now();
        let mut order = Self {
            id: Uuid::now_v7(),
            order_number: input.order_number.trim().to_string(),
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            items: input.items,
            subtotal: 0.0,
            total_discount: 0.0,
            total: 0.0,
            status: input.status,
            order_date: input.order_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        order.recompute_totals();
        order
    }

    /// Merge the supplied fields; replacing the items recomputes the totals
    pub fn apply_update(&mut self, update: UpdateOrder) {
        if let Some(order_number) = update.order_number {
            self.order_number = order_number.trim().to_string();
        }
        if let Some(customer_name) = update.customer_name {
            self.customer_name = customer_name;
        }
        if let Some(customer_email) = update.customer_email {
            self.customer_email = customer_email;
        }
        if let Some(items) = update.items {
            self.items = items;
            self.recompute_totals();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(order_date) = update.order_date {
            self.order_date = order_date;
        }
        self.updated_at = Utc::now();
    }

    fn recompute_totals(&mut self) {
        let totals = OrderTotals::from_items(&self.items);
        self.subtotal = totals.subtotal;
        self.total_discount = totals.total_discount;
        self.total = totals.total;
    }
}

/// DTO for creating an order. Totals are computed, not accepted.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateOrder {
    #[validate(length(min = 1, max = 50))]
    pub order_number: String,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    #[validate(length(min = 1), nested)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status: OrderStatus,
    /// Defaults to the creation time
    pub order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrder {
    #[validate(length(min = 1, max = 50))]
    pub order_number: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub customer_name: Option<String>,
    #[validate(email)]
    pub customer_email: Option<String>,
    #[validate(length(min = 1), nested)]
    pub items: Option<Vec<OrderItem>>,
    pub status: Option<OrderStatus>,
    pub order_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: u32, discount: f64) -> OrderItem {
        OrderItem {
            product_id: "p-1".to_string(),
            product_name: "Widget".to_string(),
            description: String::new(),
            quantity,
            price,
            discount,
        }
    }

    fn input(items: Vec<OrderItem>) -> CreateOrder {
        CreateOrder {
            order_number: "ORD-1".to_string(),
            customer_name: "Ana".to_string(),
            customer_email: "ana@example.com".to_string(),
            items,
            status: OrderStatus::default(),
            order_date: None,
        }
    }

    #[test]
    fn test_totals() {
        let totals = OrderTotals::from_items(&[item(10.0, 3, 5.0), item(2.5, 2, 0.0)]);
        assert_eq!(totals.subtotal, 35.0);
        assert_eq!(totals.total_discount, 5.0);
        assert_eq!(totals.total, 30.0);
    }

    #[test]
    fn test_total_never_negative() {
        let totals = OrderTotals::from_items(&[item(1.0, 1, 50.0)]);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn test_new_order_defaults() {
        let order = Order::new(input(vec![item(4.0, 2, 1.0)]));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, 7.0);
        assert_eq!(order.order_date, order.created_at);
    }

    #[test]
    fn test_replacing_items_recomputes_totals() {
        let mut order = Order::new(input(vec![item(4.0, 2, 0.0)]));
        order.apply_update(UpdateOrder {
            status: Some(OrderStatus::Shipped),
            ..Default::default()
        });
        assert_eq!(order.total, 8.0);

        order.apply_update(UpdateOrder {
            items: Some(vec![item(100.0, 1, 10.0)]),
            ..Default::default()
        });
        assert_eq!(order.subtotal, 100.0);
        assert_eq!(order.total, 90.0);
        assert_eq!(order.status, OrderStatus::Shipped);
    }

    #[test]
    fn test_validation_rejects_empty_items_and_zero_quantity() {
        assert!(input(vec![]).validate().is_err());
        assert!(input(vec![item(1.0, 0, 0.0)]).validate().is_err());
        assert!(input(vec![item(1.0, 1, 0.0)]).validate().is_ok());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(OrderStatus::Cancelled.to_string(), "cancelled");
        assert_eq!("shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
    }
}
