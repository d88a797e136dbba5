//! HTTP handlers for Coupons API

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    JwtAuth, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestResponse, BadRequestUuidResponse, BadRequestValidationResponse,
        ConflictResponse, ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
    jwt_auth_middleware, require_admin,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CouponResult;
use crate::models::{
    Coupon, CouponApplication, CouponValidation, CreateCoupon, DiscountType, UpdateCoupon,
};
use crate::repository::CouponRepository;
use crate::service::CouponService;

/// OpenAPI documentation for Coupons API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_coupons,
        create_coupon,
        get_coupon,
        update_coupon,
        delete_coupon,
        get_by_code,
        validate_coupon,
        apply_coupon,
    ),
    components(
        schemas(
            Coupon, CreateCoupon, UpdateCoupon, DiscountType,
            CouponValidation, CouponApplication
        ),
        responses(
            NotFoundResponse,
            BadRequestResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Coupons", description = "Discount coupon management and redemption")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<CouponService<R>>;

/// Create the coupons router.
///
/// - public: lookup by code, validate
/// - authenticated: apply
/// - admin: list, get by id, create, update, delete
pub fn router<R: CouponRepository + 'static>(service: CouponService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/code/{code}", get(get_by_code))
        .route("/validate/{code}", post(validate_coupon));

    let authenticated = Router::new()
        .route("/apply/{code}", post(apply_coupon))
        .route_layer(middleware::from_fn_with_state(
            auth.clone(),
            jwt_auth_middleware,
        ));

    let admin = Router::new()
        .route("/", get(list_coupons).post(create_coupon))
        .route(
            "/{id}",
            get(get_coupon).put(update_coupon).delete(delete_coupon),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public
        .merge(authenticated)
        .merge(admin)
        .with_state(shared_service)
}

/// List all coupons
#[utoipa::path(
    get,
    path = "",
    tag = "Coupons",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of coupons", body = Vec<Coupon>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_coupons<R: CouponRepository>(
    State(service): State<SharedService<R>>,
) -> CouponResult<Json<Vec<Coupon>>> {
    let coupons = service.list_coupons().await?;
    Ok(Json(coupons))
}

/// Create a new coupon
#[utoipa::path(
    post,
    path = "",
    tag = "Coupons",
    security(("bearer_auth" = [])),
    request_body = CreateCoupon,
    responses(
        (status = 201, description = "Coupon created successfully", body = Coupon),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_coupon<R: CouponRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(input): ValidatedJson<CreateCoupon>,
) -> CouponResult<impl IntoResponse> {
    let coupon = service.create_coupon(input).await?;
    Ok((StatusCode::CREATED, Json(coupon)))
}

/// Get a coupon by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Coupons",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Coupon ID")
    ),
    responses(
        (status = 200, description = "Coupon found", body = Coupon),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_coupon<R: CouponRepository>(
    State(service): State<SharedService<R>>,
    UuidPath(id): UuidPath,
) -> CouponResult<Json<Coupon>> {
    let coupon = service.get_coupon(id).await?;
    Ok(Json(coupon))
}

/// Update a coupon
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Coupons",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Coupon ID")
    ),
    request_body = UpdateCoupon,
    responses(
        (status = 200, description = "Coupon updated successfully", body = Coupon),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_coupon<R: CouponRepository>(
    State(service): State<SharedService<R>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCoupon>,
) -> CouponResult<Json<Coupon>> {
    let coupon = service.update_coupon(id, input).await?;
    Ok(Json(coupon))
}

/// Delete a coupon
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Coupons",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Coupon ID")
    ),
    responses(
        (status = 204, description = "Coupon deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_coupon<R: CouponRepository>(
    State(service): State<SharedService<R>>,
    UuidPath(id): UuidPath,
) -> CouponResult<StatusCode> {
    service.delete_coupon(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get a coupon by its code (case-insensitive)
#[utoipa::path(
    get,
    path = "/code/{code}",
    tag = "Coupons",
    params(
        ("code" = String, Path, description = "Coupon code")
    ),
    responses(
        (status = 200, description = "Coupon found", body = Coupon),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_by_code<R: CouponRepository>(
    State(service): State<SharedService<R>>,
    Path(code): Path<String>,
) -> CouponResult<Json<Coupon>> {
    let coupon = service.get_by_code(&code).await?;
    Ok(Json(coupon))
}

/// Check whether a coupon can be used
#[utoipa::path(
    post,
    path = "/validate/{code}",
    tag = "Coupons",
    params(
        ("code" = String, Path, description = "Coupon code")
    ),
    responses(
        (status = 200, description = "Coupon is valid", body = CouponValidation),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn validate_coupon<R: CouponRepository>(
    State(service): State<SharedService<R>>,
    Path(code): Path<String>,
) -> CouponResult<Json<CouponValidation>> {
    let validation = service.validate_coupon(&code).await?;
    Ok(Json(validation))
}

/// Validate a coupon and consume one use
#[utoipa::path(
    post,
    path = "/apply/{code}",
    tag = "Coupons",
    security(("bearer_auth" = [])),
    params(
        ("code" = String, Path, description = "Coupon code")
    ),
    responses(
        (status = 200, description = "Coupon applied", body = CouponApplication),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn apply_coupon<R: CouponRepository>(
    State(service): State<SharedService<R>>,
    Path(code): Path<String>,
) -> CouponResult<Json<CouponApplication>> {
    let application = service.apply_coupon(&code).await?;
    Ok(Json(application))
}
