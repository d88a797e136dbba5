//! User Service - registration, role resolution and credential checks

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use domain_roles::{RoleRepository, RoleSummary};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, LoginUser, UpdateUser, User, UserResponse, normalize_email};
use crate::repository::UserRepository;

pub struct UserService<U: UserRepository, R: RoleRepository> {
    repository: Arc<U>,
    roles: Arc<R>,
}

impl<U: UserRepository, R: RoleRepository> UserService<U, R> {
    pub fn new(repository: U, roles: R) -> Self {
        Self {
            repository: Arc::new(repository),
            roles: Arc::new(roles),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<UserResponse>> {
        let users = self.repository.list().await?;

        let mut ids: Vec<Uuid> = users.iter().flat_map(|u| u.role_ids.iter().copied()).collect();
        ids.sort();
        ids.dedup();

        let roles: HashMap<Uuid, RoleSummary> = self
            .roles
            .get_by_ids(&ids)
            .await?
            .iter()
            .map(|r| (r.id, RoleSummary::from(r)))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let summaries = user
                    .role_ids
                    .iter()
                    .filter_map(|id| roles.get(id).cloned())
                    .collect();
                UserResponse::new(user, summaries)
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserResponse> {
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;
        self.to_response(user).await
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        let email = normalize_email(&input.email);
        if self.repository.get_by_email(&email).await?.is_some() {
            return Err(UserError::DuplicateEmail(email));
        }

        let role_ids = self.resolve_roles(&input.roles).await?;
        let password_hash = self.hash_password(&input.password)?;

        let user = User::new(input.name, &email, password_hash, role_ids);
        let user = self.repository.create(user).await?;
        tracing::info!(user_id = %user.id, "User created");

        self.to_response(user).await
    }

    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: Uuid, input: UpdateUser) -> UserResult<UserResponse> {
        let mut user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound)?;

        if let Some(ref email) = input.email {
            let email = normalize_email(email);
            if email != user.email {
                if let Some(other) = self.repository.get_by_email(&email).await? {
                    if other.id != id {
                        return Err(UserError::DuplicateEmail(email));
                    }
                }
            }
        }

        let role_ids = match input.roles {
            Some(ref names) => Some(self.resolve_roles(names).await?),
            None => None,
        };
        let password_hash = input
            .password
            .as_deref()
            .map(|p| self.hash_password(p))
            .transpose()?;

        user.apply_update(input.name, input.email.as_deref(), password_hash, role_ids);
        let user = self.repository.update(user).await?;
        tracing::info!(user_id = %user.id, "User updated");

        self.to_response(user).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound);
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Check an email/password pair and return the identity to put in a token
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> UserResult<LoginUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(UserError::MissingCredentials);
        }

        let Some(user) = self.repository.get_by_email(&normalize_email(email)).await? else {
            tracing::info!("Login rejected: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let roles = self
            .roles
            .get_by_ids(&user.role_ids)
            .await?
            .into_iter()
            .map(|r| r.name)
            .collect();

        tracing::info!(user_id = %user.id, "User authenticated");
        Ok(LoginUser {
            id: user.id,
            name: user.name,
            email: user.email,
            roles,
        })
    }

    async fn to_response(&self, user: User) -> UserResult<UserResponse> {
        let roles = self
            .roles
            .get_by_ids(&user.role_ids)
            .await?
            .iter()
            .map(RoleSummary::from)
            .collect();
        Ok(UserResponse::new(user, roles))
    }

    /// Every name must match an existing role; duplicates collapse
    async fn resolve_roles(&self, names: &[String]) -> UserResult<Vec<Uuid>> {
        if names.is_empty() {
            return Err(UserError::RolesRequired);
        }

        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let role = self
                .roles
                .get_by_name(name.trim())
                .await?
                .ok_or_else(|| UserError::RoleNotFound(name.clone()))?;
            if !ids.contains(&role.id) {
                ids.push(role.id);
            }
        }
        Ok(ids)
    }

    // Password helpers

    fn hash_password(&self, password: &str) -> UserResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::PasswordHash(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> UserResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};
    use domain_roles::{CreateRole, InMemoryRoleRepository, Role};

    async fn roles_with(names: &[&str]) -> InMemoryRoleRepository {
        let repo = InMemoryRoleRepository::new();
        for name in names {
            repo.create(Role::new(CreateRole {
                name: name.to_string(),
                description: None,
            }))
            .await
            .unwrap();
        }
        repo
    }

    fn create_input(email: &str, roles: &[&str]) -> CreateUser {
        CreateUser {
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "s3cret-pass".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_create_user_resolves_roles_and_hashes_password() {
        let users = InMemoryUserRepository::new();
        let service = UserService::new(users.clone(), roles_with(&["admin", "customer"]).await);

        let created = service
            .create_user(create_input("Ana@Example.com", &["customer", "admin", "customer"]))
            .await
            .unwrap();

        assert_eq!(created.email, "ana@example.com");
        let names: Vec<_> = created.roles.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["customer", "admin"]);

        let stored = users.get_by_id(created.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "s3cret-pass");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_create_user_requires_a_role() {
        let service = UserService::new(InMemoryUserRepository::new(), roles_with(&[]).await);

        let err = service
            .create_user(create_input("a@example.com", &[]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "At least one role is required");
    }

    #[tokio::test]
    async fn test_create_user_with_unknown_role_is_not_found() {
        let service = UserService::new(InMemoryUserRepository::new(), roles_with(&["admin"]).await);

        let err = service
            .create_user(create_input("a@example.com", &["admin", "ghost"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Role 'ghost' not found");
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts_before_hashing() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_get_by_email().returning(|email| {
            Ok(Some(User::new("Other".to_string(), email, String::new(), vec![])))
        });
        mock_repo.expect_create().never();

        let service = UserService::new(mock_repo, roles_with(&["admin"]).await);
        let err = service
            .create_user(create_input("Taken@example.com", &["admin"]))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "User with email 'taken@example.com' already exists"
        );
    }

    #[tokio::test]
    async fn test_update_keeps_roles_unless_supplied() {
        let service = UserService::new(
            InMemoryUserRepository::new(),
            roles_with(&["admin", "customer"]).await,
        );
        let created = service
            .create_user(create_input("a@example.com", &["customer"]))
            .await
            .unwrap();

        let updated = service
            .update_user(
                created.id,
                UpdateUser {
                    name: Some("Ana Maria".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.roles, created.roles);

        let err = service
            .update_user(
                created.id,
                UpdateUser {
                    roles: Some(vec![]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::RolesRequired));

        let updated = service
            .update_user(
                created.id,
                UpdateUser {
                    roles: Some(vec!["admin".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.roles[0].name, "admin");
    }

    #[tokio::test]
    async fn test_update_email_to_taken_address_conflicts() {
        let service = UserService::new(InMemoryUserRepository::new(), roles_with(&["customer"]).await);
        service
            .create_user(create_input("first@example.com", &["customer"]))
            .await
            .unwrap();
        let second = service
            .create_user(create_input("second@example.com", &["customer"]))
            .await
            .unwrap();

        let err = service
            .update_user(
                second.id,
                UpdateUser {
                    email: Some("FIRST@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let service = UserService::new(InMemoryUserRepository::new(), roles_with(&[]).await);

        assert!(matches!(
            service.update_user(Uuid::now_v7(), UpdateUser::default()).await,
            Err(UserError::NotFound)
        ));
        assert!(matches!(
            service.delete_user(Uuid::now_v7()).await,
            Err(UserError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = UserService::new(InMemoryUserRepository::new(), roles_with(&["admin"]).await);
        let created = service
            .create_user(create_input("root@example.com", &["admin"]))
            .await
            .unwrap();

        let login = service
            .authenticate("ROOT@example.com", "s3cret-pass")
            .await
            .unwrap();
        assert_eq!(login.id, created.id);
        assert_eq!(login.roles, vec!["admin".to_string()]);

        assert!(matches!(
            service.authenticate("root@example.com", "wrong-pass").await,
            Err(UserError::InvalidCredentials)
        ));
        assert!(matches!(
            service.authenticate("nobody@example.com", "s3cret-pass").await,
            Err(UserError::InvalidCredentials)
        ));
        assert!(matches!(
            service.authenticate("", "s3cret-pass").await,
            Err(UserError::MissingCredentials)
        ));
        assert!(matches!(
            service.authenticate("root@example.com", "").await,
            Err(UserError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_list_users_attaches_role_summaries() {
        let service = UserService::new(
            InMemoryUserRepository::new(),
            roles_with(&["admin", "customer"]).await,
        );
        service
            .create_user(create_input("a@example.com", &["admin"]))
            .await
            .unwrap();
        service
            .create_user(create_input("b@example.com", &["customer", "admin"]))
            .await
            .unwrap();

        let users = service.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        let by_email: HashMap<_, _> = users.iter().map(|u| (u.email.as_str(), u)).collect();
        assert_eq!(by_email["a@example.com"].roles.len(), 1);
        assert_eq!(by_email["b@example.com"].roles[0].name, "customer");
    }
}
