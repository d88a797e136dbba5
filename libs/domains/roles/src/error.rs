use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoleError {
    #[error("Role not found")]
    NotFound,

    #[error("Role with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type RoleResult<T> = Result<T, RoleError>;

impl From<RoleError> for AppError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::NotFound => AppError::NotFound(err.to_string()),
            RoleError::DuplicateName(_) => AppError::Conflict(err.to_string()),
            RoleError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for RoleError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for RoleError {
    fn from(err: mongodb::error::Error) -> Self {
        RoleError::Database(err.to_string())
    }
}
