//! Shared application state handed to every API module.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

/// Cloned per router (inexpensive Arc clones inside the driver types).
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    pub db: Database,
    /// Token issuer/verifier shared by the guarded routers
    pub jwt: JwtAuth,
}
