//! Coupons API routes

use axum::Router;
use domain_coupons::{CouponService, MongoCouponRepository, handlers};
use mongodb::Database;

use crate::state::AppState;

/// Create coupons router
pub fn router(state: &AppState) -> Router {
    let repository = MongoCouponRepository::new(&state.db);
    handlers::router(CouponService::new(repository), state.jwt.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoCouponRepository::new(db).init_indexes().await?;
    Ok(())
}
