//! HTTP handlers for Orders API

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

use crate::error::OrderResult;
use crate::models::{CreateOrder, Order, OrderItem, OrderStatus, UpdateOrder};
use crate::repository::OrderRepository;
use crate::service::OrderService;

/// OpenAPI documentation for Orders API
#[derive(OpenApi)]
#[openapi(
    paths(list_orders, create_order, get_order, update_order, delete_order),
    components(
        schemas(Order, OrderItem, OrderStatus, CreateOrder, UpdateOrder),
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
        (name = "Orders", description = "Customer order management")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<OrderService<R>>;

/// Create the orders router. Reads are public, writes need an admin token.
pub fn router<R: OrderRepository + 'static>(service: OrderService<R>, auth: JwtAuth) -> Router {
    let public = Router::new()
        .route("/", get(list_orders))
        .route("/{id}", get(get_order));

    let admin = Router::new()
        .route("/", post(create_order))
        .route("/{id}", put(update_order).delete(delete_order))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public.merge(admin).with_state(Arc::new(service))
}

/// List all orders
#[utoipa::path(
    get,
    path = "",
    tag = "Orders",
    responses(
        (status = 200, description = "List of orders", body = Vec<Order>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_orders<R: OrderRepository>(
    State(service): State<SharedService<R>>,
) -> OrderResult<Json<Vec<Order>>> {
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}

/// Create a new order
#[utoipa::path(
    post,
    path = "",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = CreateOrder,
    responses(
        (status = 201, description = "Order created successfully", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_order<R: OrderRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(input): ValidatedJson<CreateOrder>,
) -> OrderResult<impl IntoResponse> {
    let order = service.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Orders",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_order<R: OrderRepository>(
    State(service): State<SharedService<R>>,
    UuidPath(id): UuidPath,
) -> OrderResult<Json<Order>> {
    let order = service.get_order(id).await?;
    Ok(Json(order))
}

/// Update an order
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrder,
    responses(
        (status = 200, description = "Order updated successfully", body = Order),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_order<R: OrderRepository>(
    State(service): State<SharedService<R>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrder>,
) -> OrderResult<Json<Order>> {
    let order = service.update_order(id, input).await?;
    Ok(Json(order))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Order deleted successfully"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_order<R: OrderRepository>(
    State(service): State<SharedService<R>>,
    UuidPath(id): UuidPath,
) -> OrderResult<StatusCode> {
    service.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
