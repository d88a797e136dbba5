//! Coupon Service - validation and application rules

use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CouponError, CouponResult};
use crate::models::{
    Coupon, CouponApplication, CouponState, CouponValidation, CreateCoupon, UpdateCoupon,
    normalize_code,
};
use crate::repository::CouponRepository;

const VALID_MESSAGE: &str = "Coupon is valid";
const APPLIED_MESSAGE: &str = "Coupon applied successfully";

/// Turn a non-valid state into the error reported to callers.
fn reject(state: CouponState) -> CouponResult<()> {
    match state {
        CouponState::Valid => Ok(()),
        CouponState::Unknown => Err(CouponError::NotFound),
        CouponState::Inactive => Err(CouponError::Inactive),
        CouponState::Expired => Err(CouponError::Expired),
        CouponState::Exhausted => Err(CouponError::Exhausted),
    }
}

pub struct CouponService<R: CouponRepository> {
    repository: Arc<R>,
}

impl<R: CouponRepository> CouponService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_coupons(&self) -> CouponResult<Vec<Coupon>> {
        self.repository.list().await
    }

    #[instrument(skip(self))]
    pub async fn get_coupon(&self, id: Uuid) -> CouponResult<Coupon> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(CouponError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn get_by_code(&self, code: &str) -> CouponResult<Coupon> {
        self.repository
            .get_by_code(&normalize_code(code))
            .await?
            .ok_or(CouponError::NotFound)
    }

    #[instrument(skip(self, input), fields(code = %input.code))]
    pub async fn create_coupon(&self, input: CreateCoupon) -> CouponResult<Coupon> {
        let coupon = Coupon::new(input);

        if self.repository.get_by_code(&coupon.code).await?.is_some() {
            return Err(CouponError::DuplicateCode(coupon.code));
        }

        let coupon = self.repository.create(coupon).await?;
        tracing::info!(coupon_id = %coupon.id, code = %coupon.code, "Coupon created");
        Ok(coupon)
    }

    #[instrument(skip(self, input))]
    pub async fn update_coupon(&self, id: Uuid, input: UpdateCoupon) -> CouponResult<Coupon> {
        let mut coupon = self.get_coupon(id).await?;

        if let Some(ref code) = input.code {
            let code = normalize_code(code);
            if code != coupon.code {
                if let Some(other) = self.repository.get_by_code(&code).await? {
                    if other.id != id {
                        return Err(CouponError::DuplicateCode(code));
                    }
                }
            }
        }

        coupon.apply_update(input);
        let coupon = self.repository.update(coupon).await?;
        tracing::info!(coupon_id = %coupon.id, code = %coupon.code, "Coupon updated");
        Ok(coupon)
    }

    #[instrument(skip(self))]
    pub async fn delete_coupon(&self, id: Uuid) -> CouponResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CouponError::NotFound);
        }
        tracing::info!(coupon_id = %id, "Coupon deleted");
        Ok(())
    }

    /// Check whether a code can be used right now. No side effects.
    #[instrument(skip(self))]
    pub async fn validate_coupon(&self, code: &str) -> CouponResult<CouponValidation> {
        let code = normalize_code(code);
        let Some(coupon) = self.repository.get_by_code(&code).await? else {
            tracing::debug!(%code, "Coupon lookup failed");
            return Err(CouponError::NotFound);
        };

        let state = coupon.state_at(Utc::now());
        if let Err(e) = reject(state) {
            tracing::info!(coupon_id = %coupon.id, %code, %state, "Coupon rejected");
            return Err(e);
        }

        Ok(CouponValidation {
            valid: true,
            coupon,
            message: VALID_MESSAGE.to_string(),
        })
    }

    /// Validate, then consume one use.
    ///
    /// The increment is guarded in the store, so concurrent applies never
    /// push `current_uses` past `max_uses`. When the guard loses a race the
    /// coupon is re-read to report why.
    #[instrument(skip(self))]
    pub async fn apply_coupon(&self, code: &str) -> CouponResult<CouponApplication> {
        let validated = self.validate_coupon(code).await?.coupon;

        match self.repository.increment_usage(validated.id).await? {
            Some(coupon) => {
                tracing::info!(
                    coupon_id = %coupon.id,
                    code = %coupon.code,
                    current_uses = coupon.current_uses,
                    "Coupon applied"
                );
                Ok(CouponApplication {
                    applied: true,
                    coupon,
                    message: APPLIED_MESSAGE.to_string(),
                })
            }
            None => {
                let current = self.repository.get_by_id(validated.id).await?;
                let state = CouponState::of(current.as_ref(), Utc::now());
                tracing::warn!(coupon_id = %validated.id, %state, "Coupon usage guard did not match");
                reject(state)?;
                // Usage was lowered again after the guard ran
                Err(CouponError::Exhausted)
            }
        }
    }
}
