//! UUID path parameter extractor.

use crate::errors::AppError;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use uuid::Uuid;

/// Extractor for a single UUID path parameter.
///
/// Rejects with `400 INVALID_UUID` instead of axum's plain-text rejection.
///
/// # Example
/// ```ignore
/// use axum::{Router, routing::get};
/// use axum_helpers::extractors::UuidPath;
///
/// async fn get_coupon(UuidPath(id): UuidPath) -> String {
///     format!("Coupon ID: {}", id)
/// }
///
/// let app: Router = Router::new().route("/coupons/{id}", get(get_coupon));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let id = Uuid::parse_str(&raw)?;
        Ok(UuidPath(id))
    }
}
