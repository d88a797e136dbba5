//! Login endpoint

use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::{
    JwtAuth, ValidatedJson,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse, UnauthorizedResponse},
};
use domain_roles::RoleRepository;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{UserError, UserResult};
use crate::models::{LoginRequest, LoginResponse, LoginUser};
use crate::repository::UserRepository;
use crate::service::UserService;

/// OpenAPI documentation for Auth API
#[derive(OpenApi)]
#[openapi(
    paths(login),
    components(
        schemas(LoginRequest, LoginResponse, LoginUser),
        responses(BadRequestResponse, UnauthorizedResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "Auth", description = "Token issuance")
    )
)]
pub struct AuthApiDoc;

/// Application state for auth handlers
pub struct AuthState<U: UserRepository, R: RoleRepository> {
    pub service: UserService<U, R>,
    pub jwt_auth: JwtAuth,
}

pub fn auth_router<U, R>(service: UserService<U, R>, jwt_auth: JwtAuth) -> Router
where
    U: UserRepository + 'static,
    R: RoleRepository + 'static,
{
    Router::new()
        .route("/login", post(login))
        .with_state(Arc::new(AuthState { service, jwt_auth }))
}

/// Exchange email and password for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<U: UserRepository, R: RoleRepository>(
    State(state): State<Arc<AuthState<U, R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> UserResult<Json<LoginResponse>> {
    let user = state
        .service
        .authenticate(&input.email, &input.password)
        .await?;

    let token = state
        .jwt_auth
        .create_token(&user.id.to_string(), &user.email, &user.name, &user.roles)
        .map_err(|e| {
            tracing::error!("Failed to create access token: {:?}", e);
            UserError::Internal("Failed to create token".to_string())
        })?;

    Ok(Json(LoginResponse { token, user }))
}
