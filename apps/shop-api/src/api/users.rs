//! Users and auth API routes
//!
//! Both routers resolve role names through the roles collection.

use axum::Router;
use domain_roles::MongoRoleRepository;
use domain_users::{MongoUserRepository, UserService, auth_router as login_router, handlers};
use mongodb::Database;

use crate::state::AppState;

fn service(state: &AppState) -> UserService<MongoUserRepository, MongoRoleRepository> {
    UserService::new(
        MongoUserRepository::new(&state.db),
        MongoRoleRepository::new(&state.db),
    )
}

/// Create users router
pub fn router(state: &AppState) -> Router {
    handlers::router(service(state), state.jwt.clone())
}

/// Create the `/login` router
pub fn auth_router(state: &AppState) -> Router {
    login_router(service(state), state.jwt.clone())
}

pub async fn init_indexes(db: &Database) -> eyre::Result<()> {
    MongoUserRepository::new(db).init_indexes().await?;
    Ok(())
}
