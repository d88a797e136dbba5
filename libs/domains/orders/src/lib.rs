//! Orders Domain
//!
//! Customer orders with line items. Subtotal, discount and total are always
//! derived from the items.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{OrderError, OrderResult};
pub use handlers::ApiDoc;
pub use models::{CreateOrder, Order, OrderItem, OrderStatus, OrderTotals, UpdateOrder};
pub use mongodb::MongoOrderRepository;
pub use repository::{InMemoryOrderRepository, OrderRepository};
pub use service::OrderService;
