use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{CouponError, CouponResult};
use crate::models::{Coupon, CouponState};

/// Repository trait for Coupon persistence
///
/// Codes passed to lookups are expected to be normalized already.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// All coupons, newest first
    async fn list(&self) -> CouponResult<Vec<Coupon>>;

    async fn get_by_id(&self, id: Uuid) -> CouponResult<Option<Coupon>>;

    async fn get_by_code(&self, code: &str) -> CouponResult<Option<Coupon>>;

    /// Insert a coupon; fails with `DuplicateCode` if the code is taken
    async fn create(&self, coupon: Coupon) -> CouponResult<Coupon>;

    /// Replace a stored coupon by id
    async fn update(&self, coupon: Coupon) -> CouponResult<Coupon>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: Uuid) -> CouponResult<bool>;

    /// Atomically add one use if the coupon is active and under its cap.
    ///
    /// Returns the updated coupon, or `None` when the guard did not match
    /// (missing, inactive, expired or exhausted).
    async fn increment_usage(&self, id: Uuid) -> CouponResult<Option<Coupon>>;
}

/// In-memory implementation of CouponRepository (for development/testing)
#[derive(Clone, Default)]
pub struct InMemoryCouponRepository {
    coupons: Arc<RwLock<HashMap<Uuid, Coupon>>>,
}

impl InMemoryCouponRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CouponRepository for InMemoryCouponRepository {
    async fn list(&self) -> CouponResult<Vec<Coupon>> {
        let coupons = self.coupons.read().await;
        let mut result: Vec<Coupon> = coupons.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(result)
    }

    async fn get_by_id(&self, id: Uuid) -> CouponResult<Option<Coupon>> {
        let coupons = self.coupons.read().await;
        Ok(coupons.get(&id).cloned())
    }

    async fn get_by_code(&self, code: &str) -> CouponResult<Option<Coupon>> {
        let coupons = self.coupons.read().await;
        Ok(coupons.values().find(|c| c.code == code).cloned())
    }

    async fn create(&self, coupon: Coupon) -> CouponResult<Coupon> {
        let mut coupons = self.coupons.write().await;

        if coupons.values().any(|c| c.code == coupon.code) {
            return Err(CouponError::DuplicateCode(coupon.code));
        }

        coupons.insert(coupon.id, coupon.clone());
        tracing::info!(coupon_id = %coupon.id, code = %coupon.code, "Created coupon");
        Ok(coupon)
    }

    async fn update(&self, coupon: Coupon) -> CouponResult<Coupon> {
        let mut coupons = self.coupons.write().await;

        if !coupons.contains_key(&coupon.id) {
            return Err(CouponError::NotFound);
        }
        if coupons
            .values()
            .any(|c| c.id != coupon.id && c.code == coupon.code)
        {
            return Err(CouponError::DuplicateCode(coupon.code));
        }

        coupons.insert(coupon.id, coupon.clone());
        Ok(coupon)
    }

    async fn delete(&self, id: Uuid) -> CouponResult<bool> {
        let mut coupons = self.coupons.write().await;
        Ok(coupons.remove(&id).is_some())
    }

    async fn increment_usage(&self, id: Uuid) -> CouponResult<Option<Coupon>> {
        let mut coupons = self.coupons.write().await;

        let Some(coupon) = coupons.get_mut(&id) else {
            return Ok(None);
        };
        let now = chrono::Utc::now();
        if coupon.state_at(now) != CouponState::Valid {
            return Ok(None);
        }

        coupon.current_uses += 1;
        coupon.updated_at = now;
        Ok(Some(coupon.clone()))
    }
}
