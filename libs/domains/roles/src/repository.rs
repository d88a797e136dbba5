use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{RoleError, RoleResult};
use crate::models::Role;

/// Repository trait for Role persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list(&self) -> RoleResult<Vec<Role>>;

    async fn get_by_id(&self, id: Uuid) -> RoleResult<Option<Role>>;

    /// Fetch every role whose id is in `ids`; unknown ids are skipped
    async fn get_by_ids(&self, ids: &[Uuid]) -> RoleResult<Vec<Role>>;

    async fn get_by_name(&self, name: &str) -> RoleResult<Option<Role>>;

    async fn create(&self, role: Role) -> RoleResult<Role>;

    async fn update(&self, role: Role) -> RoleResult<Role>;

    async fn delete(&self, id: Uuid) -> RoleResult<bool>;
}

/// In-memory implementation of RoleRepository (for development/testing)
#[derive(Clone, Default)]
pub struct InMemoryRoleRepository {
    roles: Arc<RwLock<HashMap<Uuid, Role>>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn list(&self) -> RoleResult<Vec<Role>> {
        let roles = self.roles.read().await;
        let mut result: Vec<Role> = roles.values().cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn get_by_id(&self, id: Uuid) -> RoleResult<Option<Role>> {
        let roles = self.roles.read().await;
        Ok(roles.get(&id).cloned())
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> RoleResult<Vec<Role>> {
        let roles = self.roles.read().await;
        Ok(ids.iter().filter_map(|id| roles.get(id).cloned()).collect())
    }

    async fn get_by_name(&self, name: &str) -> RoleResult<Option<Role>> {
        let roles = self.roles.read().await;
        Ok(roles.values().find(|r| r.name == name).cloned())
    }

    async fn create(&self, role: Role) -> RoleResult<Role> {
        let mut roles = self.roles.write().await;

        if roles.values().any(|r| r.name == role.name) {
            return Err(RoleError::DuplicateName(role.name));
        }

        roles.insert(role.id, role.clone());
        tracing::info!(role_id = %role.id, name = %role.name, "Created role");
        Ok(role)
    }

    async fn update(&self, role: Role) -> RoleResult<Role> {
        let mut roles = self.roles.write().await;

        if !roles.contains_key(&role.id) {
            return Err(RoleError::NotFound);
        }
        if roles.values().any(|r| r.id != role.id && r.name == role.name) {
            return Err(RoleError::DuplicateName(role.name));
        }

        roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn delete(&self, id: Uuid) -> RoleResult<bool> {
        let mut roles = self.roles.write().await;
        Ok(roles.remove(&id).is_some())
    }
}
