//! Roles Domain
//!
//! Named roles that users reference by id. The `admin` role unlocks the
//! administrative routes of every other domain.

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{RoleError, RoleResult};
pub use handlers::ApiDoc;
pub use models::{CreateRole, Role, RoleSummary, UpdateRole};
pub use mongodb::MongoRoleRepository;
pub use repository::{InMemoryRoleRepository, RoleRepository};
pub use service::RoleService;
