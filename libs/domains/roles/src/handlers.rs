//! HTTP handlers for Roles API

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware, require_admin,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::RoleResult;
use crate::models::{CreateRole, Role, RoleSummary, UpdateRole};
use crate::repository::RoleRepository;
use crate::service::RoleService;

#[derive(OpenApi)]
#[openapi(
    paths(list_roles, create_role, get_role, update_role, delete_role),
    components(
        schemas(Role, CreateRole, UpdateRole, RoleSummary),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Roles", description = "Role management endpoints")
    )
)]
pub struct ApiDoc;

/// Roles router: reads are public, writes need an admin token.
pub fn router<R: RoleRepository + 'static>(service: RoleService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/", get(list_roles))
        .route("/{id}", get(get_role));

    let admin = Router::new()
        .route("/", post(create_role))
        .route("/{id}", put(update_role).delete(delete_role))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public.merge(admin).with_state(shared_service)
}

/// List all roles
#[utoipa::path(
    get,
    path = "",
    tag = "Roles",
    responses(
        (status = 200, description = "List of roles", body = Vec<Role>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_roles<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
) -> RoleResult<Json<Vec<Role>>> {
    let roles = service.list_roles().await?;
    Ok(Json(roles))
}

/// Create a new role
#[utoipa::path(
    post,
    path = "",
    tag = "Roles",
    security(("bearer_auth" = [])),
    request_body = CreateRole,
    responses(
        (status = 201, description = "Role created successfully", body = Role),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_role<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateRole>,
) -> RoleResult<impl IntoResponse> {
    let role = service.create_role(input).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// Get a role by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Roles",
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role found", body = Role),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_role<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    UuidPath(id): UuidPath,
) -> RoleResult<Json<Role>> {
    let role = service.get_role(id).await?;
    Ok(Json(role))
}

/// Update a role
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated successfully", body = Role),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_role<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateRole>,
) -> RoleResult<Json<Role>> {
    let role = service.update_role(id, input).await?;
    Ok(Json(role))
}

/// Delete a role
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Role ID")
    ),
    responses(
        (status = 204, description = "Role deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_role<R: RoleRepository>(
    State(service): State<Arc<RoleService<R>>>,
    UuidPath(id): UuidPath,
) -> RoleResult<StatusCode> {
    service.delete_role(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
