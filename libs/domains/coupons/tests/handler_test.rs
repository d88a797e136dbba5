//! Handler tests for Coupons domain
//!
//! Drive the coupons router with `oneshot` against the in-memory repository:
//! status codes, guards, error bodies and the redemption flow.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_helpers::{ErrorResponse, JwtAuth, JwtConfig};
use domain_coupons::*;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt; // For oneshot()

const SECRET: &str = "coupon-handler-tests-secret-0123456789";

fn jwt() -> JwtAuth {
    JwtAuth::new(&JwtConfig::new(SECRET).unwrap())
}

fn token(roles: &[&str]) -> String {
    let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
    jwt()
        .create_token("user-1", "shopper@example.com", "Shopper", &roles)
        .unwrap()
}

fn app() -> Router {
    handlers::router(CouponService::new(InMemoryCouponRepository::new()), jwt())
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn create(app: &Router, payload: serde_json::Value) -> Coupon {
    let admin = token(&["admin"]);
    let response = app
        .clone()
        .oneshot(request("POST", "/", Some(&admin), Some(payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_create_coupon_returns_201_with_defaults() {
    let app = app();

    let coupon = create(
        &app,
        json!({
            "code": "save10",
            "discount_type": "percentage",
            "discount_value": 10.0
        }),
    )
    .await;

    assert_eq!(coupon.code, "SAVE10");
    assert_eq!(coupon.current_uses, 0);
    assert_eq!(coupon.min_purchase, 0.0);
    assert_eq!(coupon.max_uses, None);
    assert_eq!(coupon.expiration_date, None);
    assert!(coupon.is_active);
}

#[tokio::test]
async fn test_create_coupon_rejects_unknown_discount_type() {
    let response = app()
        .oneshot(request(
            "POST",
            "/",
            Some(&token(&["admin"])),
            Some(json!({"code": "X", "discount_type": "bogo", "discount_value": 1.0})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.error, "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_create_duplicate_code_returns_409() {
    let app = app();
    let payload = json!({"code": "DUP", "discount_type": "fixed", "discount_value": 5.0});
    create(&app, payload).await;

    let response = app
        .oneshot(request(
            "POST",
            "/",
            Some(&token(&["admin"])),
            Some(json!({"code": " dup ", "discount_type": "fixed", "discount_value": 5.0})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Coupon code already exists");
}

#[tokio::test]
async fn test_admin_routes_require_token_and_admin_role() {
    let app = app();

    let response = app
        .clone()
        .oneshot(request("GET", "/", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(request("GET", "/", Some(&token(&["customer"])), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Access denied. Administrator role required.");
}

#[tokio::test]
async fn test_validate_is_public_and_case_insensitive() {
    let app = app();
    create(
        &app,
        json!({"code": "SPRING", "discount_type": "fixed", "discount_value": 3.0}),
    )
    .await;

    let response = app
        .oneshot(request("POST", "/validate/spring", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let validation: CouponValidation = json_body(response.into_body()).await;
    assert!(validation.valid);
    assert_eq!(validation.message, "Coupon is valid");
    assert_eq!(validation.coupon.current_uses, 0);
}

#[tokio::test]
async fn test_validate_unknown_code_returns_404() {
    let response = app()
        .oneshot(request("POST", "/validate/NOPE", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Coupon not found");
}

#[tokio::test]
async fn test_validate_inactive_and_expired_return_400() {
    let app = app();
    create(
        &app,
        json!({"code": "OFF", "discount_type": "fixed", "discount_value": 1.0, "is_active": false}),
    )
    .await;
    create(
        &app,
        json!({
            "code": "OLD",
            "discount_type": "fixed",
            "discount_value": 1.0,
            "max_uses": 100,
            "expiration_date": "2020-01-01T00:00:00Z"
        }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(request("POST", "/validate/off", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Coupon is not active");

    let response = app
        .oneshot(request("POST", "/validate/old", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Coupon has expired");
}

#[tokio::test]
async fn test_apply_requires_authentication() {
    let app = app();
    create(
        &app,
        json!({"code": "AUTH", "discount_type": "fixed", "discount_value": 1.0}),
    )
    .await;

    let response = app
        .oneshot(request("POST", "/apply/auth", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_save10_flow_over_http() {
    let app = app();
    create(
        &app,
        json!({"code": "SAVE10", "discount_type": "percentage", "discount_value": 10.0, "max_uses": 2}),
    )
    .await;

    let customer = token(&["customer"]);

    let response = app
        .clone()
        .oneshot(request("POST", "/validate/save10", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for expected in 1..=2u32 {
        let response = app
            .clone()
            .oneshot(request("POST", "/apply/save10", Some(&customer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let applied: CouponApplication = json_body(response.into_body()).await;
        assert!(applied.applied);
        assert_eq!(applied.coupon.current_uses, expected);
        assert_eq!(applied.message, "Coupon applied successfully");
    }

    let response = app
        .clone()
        .oneshot(request("POST", "/apply/save10", Some(&customer), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Coupon has reached maximum uses");

    let response = app
        .oneshot(request("GET", "/code/SAVE10", None, None))
        .await
        .unwrap();
    let coupon: Coupon = json_body(response.into_body()).await;
    assert_eq!(coupon.current_uses, 2);
}

#[tokio::test]
async fn test_update_clears_max_uses_and_keeps_other_fields() {
    let app = app();
    let coupon = create(
        &app,
        json!({"code": "EDIT", "discount_type": "fixed", "discount_value": 7.5, "max_uses": 1}),
    )
    .await;

    let response = app
        .oneshot(request(
            "PUT",
            &format!("/{}", coupon.id),
            Some(&token(&["admin"])),
            Some(json!({"clear_max_uses": true, "current_uses": 3})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated: Coupon = json_body(response.into_body()).await;
    assert_eq!(updated.max_uses, None);
    assert_eq!(updated.current_uses, 3);
    assert_eq!(updated.discount_value, 7.5);
    assert_eq!(updated.code, "EDIT");
}

#[tokio::test]
async fn test_delete_returns_204_then_404() {
    let app = app();
    let coupon = create(
        &app,
        json!({"code": "BYE", "discount_type": "fixed", "discount_value": 1.0}),
    )
    .await;
    let admin = token(&["admin"]);

    let response = app
        .clone()
        .oneshot(request("DELETE", &format!("/{}", coupon.id), Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(request("DELETE", &format!("/{}", coupon.id), Some(&admin), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_with_invalid_uuid_returns_400() {
    let response = app()
        .oneshot(request("GET", "/not-a-uuid", Some(&token(&["admin"])), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
