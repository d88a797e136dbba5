use chrono::{DateTime, Utc};
use domain_roles::RoleSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// User entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    /// Stored lower-cased, unique
    pub email: String,
    /// Argon2 password hash (never exposed in API responses)
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Ids of the roles granted to this user
    pub role_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user (password and roles are resolved by the service layer)
    pub fn new(name: String, email: &str, password_hash: String, role_ids: Vec<Uuid>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            email: normalize_email(email),
            password_hash,
            role_ids,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply updates (password should already be hashed if provided)
    pub fn apply_update(
        &mut self,
        name: Option<String>,
        email: Option<&str>,
        password_hash: Option<String>,
        role_ids: Option<Vec<Uuid>>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(email) = email {
            self.email = normalize_email(email);
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        if let Some(role_ids) = role_ids {
            self.role_ids = role_ids;
        }
        self.updated_at = Utc::now();
    }
}

/// Emails compare case-insensitively
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// User response DTO (without password_hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<RoleSummary>,
}

impl UserResponse {
    pub fn new(user: User, roles: Vec<RoleSummary>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            roles,
        }
    }
}

/// DTO for creating a new user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email, length(max = 255))]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
    /// Role names, each must exist
    #[serde(default)]
    pub roles: Vec<String>,
}

/// DTO for updating an existing user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(email, length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 6, max = 128))]
    pub password: Option<String>,
    pub roles: Option<Vec<String>>,
}

/// DTO for user login
///
/// Fields default to empty so a missing value reaches the service and is
/// reported as a bad request rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Identity returned alongside a freshly issued token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoginUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Response after successful login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_never_serialized() {
        let user = User::new(
            "Ana".to_string(),
            "ana@example.com",
            "$argon2id$secret".to_string(),
            vec![],
        );

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["email"], "ana@example.com");
    }

    #[test]
    fn test_email_is_lower_cased() {
        let mut user = User::new("Ana".to_string(), " Ana@Example.COM ", String::new(), vec![]);
        assert_eq!(user.email, "ana@example.com");

        user.apply_update(None, Some("NEW@example.com"), None, None);
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.name, "Ana");
    }

    #[test]
    fn test_update_keeps_roles_when_not_supplied() {
        let role = Uuid::now_v7();
        let mut user = User::new("Ana".to_string(), "a@b.co", "h1".to_string(), vec![role]);

        user.apply_update(Some("Ana B".to_string()), None, Some("h2".to_string()), None);

        assert_eq!(user.role_ids, vec![role]);
        assert_eq!(user.password_hash, "h2");
        assert_eq!(user.name, "Ana B");
    }
}
