//! Authentication and authorization.
//!
//! Tokens are stateless HS256 JWTs. Nothing is stored server side, so a token
//! stays valid until its `exp`.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware, routing::post};
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware, require_admin};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! // Layers run bottom-up: authenticate first, then check the role.
//! let admin_only = Router::new()
//!     .route("/coupons", post(create_coupon))
//!     .route_layer(middleware::from_fn(require_admin))
//!     .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{ADMIN_ROLE, JwtAuth, JwtClaims, TOKEN_TTL};
pub use middleware::{jwt_auth_middleware, require_admin};
