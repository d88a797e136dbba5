//! Roles API routes

use axum::Router;
use domain_roles::{MongoRoleRepository, RoleService, handlers};
use mongodb::Database;

use crate::state::AppState;

/// Create roles router
pub fn router(state: &AppState) -> Router {
    let repository = MongoRoleRepository::new(&state.db);
    handlers::router(RoleService::new(repository), state.jwt.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoRoleRepository::new(db).init_indexes().await?;
    Ok(())
}
