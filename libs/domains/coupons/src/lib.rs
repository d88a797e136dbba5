//! Coupons Domain
//!
//! Discount coupons and the rules for validating and redeeming them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, auth/admin guards
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← validate / apply, uniqueness checks
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + MongoDB and in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Coupon, CouponState, DTOs
//! └─────────────┘
//! ```
//!
//! # Coupon states
//!
//! A coupon's state is derived on every read and checked in this order:
//! unknown code, inactive, expired, exhausted, valid. `apply` consumes one
//! use through a guarded increment in the store, so `current_uses` never
//! exceeds `max_uses` under concurrent redemption.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_coupons::{CouponService, MongoCouponRepository, handlers};
//!
//! let repository = MongoCouponRepository::new(&db);
//! repository.init_indexes().await?;
//! let router = handlers::router(CouponService::new(repository), jwt_auth);
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

pub use error::{CouponError, CouponResult};
pub use handlers::ApiDoc;
pub use models::{
    Coupon, CouponApplication, CouponState, CouponValidation, CreateCoupon, DiscountType,
    UpdateCoupon, normalize_code,
};
pub use mongodb::MongoCouponRepository;
pub use repository::{CouponRepository, InMemoryCouponRepository};
pub use service::CouponService;
