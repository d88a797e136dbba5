//! API routes module
//!
//! Wires every domain to its MongoDB repository and mounts it under `/v1`.
//! `axum_helpers::create_router` nests the result under `/api`.

pub mod coupons;
pub mod health;
pub mod orders;
pub mod products;
pub mod roles;
pub mod users;

use axum::Router;
use mongodb::Database;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    let v1 = Router::new()
        .nest("/products", products::router(state))
        .nest("/orders", orders::router(state))
        .nest("/users", users::router(state))
        .nest("/auth", users::auth_router(state))
        .nest("/roles", roles::router(state))
        .nest("/coupons", coupons::router(state))
        .merge(health::router(state.clone()));

    Router::new().nest("/v1", v1)
}

/// Create the collection indexes every repository relies on
pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    products::init_indexes(db).await?;
    orders::init_indexes(db).await?;
    users::init_indexes(db).await?;
    roles::init_indexes(db).await?;
    coupons::init_indexes(db).await?;
    Ok(())
}
