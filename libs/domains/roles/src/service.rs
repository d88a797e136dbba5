//! Role Service - uniqueness and existence rules

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{RoleError, RoleResult};
use crate::models::{CreateRole, Role, UpdateRole};
use crate::repository::RoleRepository;

pub struct RoleService<R: RoleRepository> {
    repository: Arc<R>,
}

impl<R: RoleRepository> RoleService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_roles(&self) -> RoleResult<Vec<Role>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_role(&self, id: Uuid) -> RoleResult<Role> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(RoleError::NotFound)
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_role(&self, input: CreateRole) -> RoleResult<Role> {
        let role = Role::new(input);

        if self.repository.get_by_name(&role.name).await?.is_some() {
            return Err(RoleError::DuplicateName(role.name));
        }

        let role = self.repository.create(role).await?;
        tracing::info!(role_id = %role.id, name = %role.name, "Role created");
        Ok(role)
    }

    #[instrument(skip(self, input))]
    pub async fn update_role(&self, id: Uuid, input: UpdateRole) -> RoleResult<Role> {
        let mut role = self.get_role(id).await?;

        if let Some(ref name) = input.name {
            let name = name.trim();
            if name != role.name {
                if let Some(other) = self.repository.get_by_name(name).await? {
                    if other.id != id {
                        return Err(RoleError::DuplicateName(name.to_string()));
                    }
                }
            }
        }

        role.apply_update(input);
        let role = self.repository.update(role).await?;
        tracing::info!(role_id = %role.id, "Role updated");
        Ok(role)
    }

    #[instrument(skip(self))]
    pub async fn delete_role(&self, id: Uuid) -> RoleResult<()> {
        if !self.repository.delete(id).await? {
            return Err(RoleError::NotFound);
        }
        tracing::info!(role_id = %id, "Role deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockRoleRepository;
    use mockall::predicate::eq;

    fn input(name: &str) -> CreateRole {
        CreateRole {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_role_checks_trimmed_name() {
        let mut mock_repo = MockRoleRepository::new();
        mock_repo
            .expect_get_by_name()
            .with(eq("admin"))
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_create().times(1).returning(Ok);

        let service = RoleService::new(mock_repo);
        let role = service.create_role(input(" admin ")).await.unwrap();
        assert_eq!(role.name, "admin");
    }

    #[tokio::test]
    async fn test_create_duplicate_role_conflicts() {
        let mut mock_repo = MockRoleRepository::new();
        mock_repo
            .expect_get_by_name()
            .returning(|name| Ok(Some(Role::new(input(name)))));
        mock_repo.expect_create().never();

        let service = RoleService::new(mock_repo);
        let err = service.create_role(input("admin")).await.unwrap_err();
        assert_eq!(err.to_string(), "Role with name 'admin' already exists");
    }

    #[tokio::test]
    async fn test_update_missing_role_is_not_found() {
        let mut mock_repo = MockRoleRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));

        let service = RoleService::new(mock_repo);
        let err = service
            .update_role(Uuid::now_v7(), UpdateRole::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Role not found");
    }

    #[tokio::test]
    async fn test_update_rename_to_taken_name_conflicts() {
        let mut mock_repo = MockRoleRepository::new();
        let staff = Role::new(input("staff"));
        let staff_id = staff.id;
        mock_repo
            .expect_get_by_id()
            .with(eq(staff_id))
            .returning(move |_| Ok(Some(staff.clone())));
        mock_repo
            .expect_get_by_name()
            .with(eq("admin"))
            .returning(|name| Ok(Some(Role::new(input(name)))));
        mock_repo.expect_update().never();

        let service = RoleService::new(mock_repo);
        let err = service
            .update_role(
                staff_id,
                UpdateRole {
                    name: Some("admin".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RoleError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_role_is_not_found() {
        let mut mock_repo = MockRoleRepository::new();
        mock_repo.expect_delete().returning(|_| Ok(false));

        let service = RoleService::new(mock_repo);
        assert!(matches!(
            service.delete_role(Uuid::now_v7()).await,
            Err(RoleError::NotFound)
        ));
    }
}
