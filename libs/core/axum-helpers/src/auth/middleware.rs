use super::jwt::{JwtAuth, JwtClaims};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

const ADMIN_REQUIRED: &str = "Access denied. Administrator role required.";

/// Extract JWT from Authorization header or cookie
fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    // Authorization: Bearer <token>
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            // Cookie: access_token=<token>
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let (name, value) = cookie.trim().split_once('=')?;
                        (name == "access_token" && !value.is_empty()).then(|| value.to_string())
                    })
                })
        })
}

/// JWT authentication middleware
///
/// Validates the token from the Authorization header or the `access_token`
/// cookie and inserts [`JwtClaims`] into the request extensions.
/// A missing or invalid token short-circuits with 401.
///
/// # Example
///
/// ```ignore
/// let protected = Router::new()
///     .route("/apply/{code}", post(apply_coupon))
///     .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
/// ```
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token_from_request(&headers) else {
        tracing::debug!("No JWT found in Authorization header or cookie");
        return Err(AppError::Unauthorized("No token provided".to_string()));
    };

    let claims = auth.verify_token(&token).map_err(|e| {
        tracing::debug!("JWT verification failed: {}", e);
        AppError::Unauthorized("Invalid token".to_string())
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Admin gate. Must run after [`jwt_auth_middleware`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let Some(claims) = request.extensions().get::<JwtClaims>() else {
        return Err(AppError::Unauthorized("Authentication required".to_string()));
    };

    if !claims.is_admin() {
        tracing::info!(user_id = %claims.sub, "Admin route denied");
        return Err(AppError::Forbidden(ADMIN_REQUIRED.to_string()));
    }

    Ok(next.run(request).await)
}
