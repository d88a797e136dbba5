//! MongoDB connector, health checks and id encoding

mod config;
mod connector;
mod errors;
mod health;
mod ids;

pub use config::MongoConfig;
pub use connector::{connect_from_config, connect_from_config_with_retry};
pub use errors::{DUPLICATE_KEY_CODE, is_duplicate_key};
pub use health::{HealthStatus, check_health_detailed};
pub use ids::{uuid_as_bson, uuids_as_bson};

// Re-export driver types so apps need not name the driver crate directly
pub use mongodb::{Client, Collection, Database};
