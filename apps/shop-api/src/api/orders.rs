//! Orders API routes

use axum::Router;
use domain_orders::{MongoOrderRepository, OrderService, handlers};
use mongodb::Database;

use crate::state::AppState;

/// Create orders router
pub fn router(state: &AppState) -> Router {
    let repository = MongoOrderRepository::new(&state.db);
    handlers::router(OrderService::new(repository), state.jwt.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoOrderRepository::new(db).init_indexes().await?;
    Ok(())
}
