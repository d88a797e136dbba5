use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_roles::RoleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("At least one role is required")]
    RolesRequired,

    #[error("Role '{0}' not found")]
    RoleNotFound(String),

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound | UserError::RoleNotFound(_) => AppError::NotFound(err.to_string()),
            UserError::DuplicateEmail(_) => AppError::Conflict(err.to_string()),
            UserError::RolesRequired | UserError::MissingCredentials => {
                AppError::BadRequest(err.to_string())
            }
            UserError::InvalidCredentials => AppError::Unauthorized(err.to_string()),
            UserError::Role(inner) => inner.into(),
            UserError::Database(msg) => AppError::Database(msg),
            UserError::PasswordHash(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for UserError {
    fn from(err: mongodb::error::Error) -> Self {
        UserError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn status(err: UserError) -> StatusCode {
        AppError::from(err).status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(UserError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(UserError::RoleNotFound("ghost".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(UserError::DuplicateEmail("a@b.c".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(status(UserError::RolesRequired), StatusCode::BAD_REQUEST);
        assert_eq!(status(UserError::MissingCredentials), StatusCode::BAD_REQUEST);
        assert_eq!(status(UserError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status(UserError::PasswordHash("salt".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_role_database_error_passes_through() {
        let err = UserError::from(RoleError::Database("down".into()));
        assert!(matches!(AppError::from(err), AppError::Database(_)));
    }
}
