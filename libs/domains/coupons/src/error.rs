use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CouponError {
    #[error("Coupon not found")]
    NotFound,

    #[error("Coupon code already exists")]
    DuplicateCode(String),

    #[error("Coupon is not active")]
    Inactive,

    #[error("Coupon has expired")]
    Expired,

    #[error("Coupon has reached maximum uses")]
    Exhausted,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CouponResult<T> = Result<T, CouponError>;

impl From<CouponError> for AppError {
    fn from(err: CouponError) -> Self {
        match err {
            CouponError::NotFound => AppError::NotFound(err.to_string()),
            CouponError::DuplicateCode(_) => AppError::Conflict(err.to_string()),
            CouponError::Inactive | CouponError::Expired | CouponError::Exhausted => {
                AppError::BadRequest(err.to_string())
            }
            CouponError::Database(msg) => AppError::Database(msg),
            CouponError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for CouponError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for CouponError {
    fn from(err: mongodb::error::Error) -> Self {
        CouponError::Database(err.to_string())
    }
}
