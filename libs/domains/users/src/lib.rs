//! Users Domain
//!
//! Registration and administration of users, plus the login endpoint that
//! issues bearer tokens. Users reference roles by id and the service
//! resolves role names through a `RoleRepository`.

pub mod auth_handlers;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use auth_handlers::{AuthApiDoc, auth_router};
pub use error::{UserError, UserResult};
pub use handlers::ApiDoc;
pub use models::{CreateUser, LoginRequest, LoginResponse, LoginUser, UpdateUser, User, UserResponse};
pub use mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
