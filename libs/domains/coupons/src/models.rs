use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// How `discount_value` is interpreted
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiscountType {
    /// Percentage of the purchase, 0-100
    Percentage,
    /// Absolute currency amount
    Fixed,
}

/// Usability of a coupon at a point in time.
///
/// Derived from the stored fields, never persisted. Conditions are checked
/// in declaration order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CouponState {
    /// No coupon with the requested code or id
    Unknown,
    /// Switched off by an administrator
    Inactive,
    /// `expiration_date` lies in the past
    Expired,
    /// `current_uses` reached `max_uses`
    Exhausted,
    /// Usable now
    Valid,
}

impl CouponState {
    /// State of an optional lookup result.
    pub fn of(coupon: Option<&Coupon>, now: DateTime<Utc>) -> Self {
        coupon.map_or(CouponState::Unknown, |c| c.state_at(now))
    }
}

/// Canonical form of a coupon code: trimmed and upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

fn default_true() -> bool {
    true
}

/// Expiration instants are kept at millisecond precision and written as
/// fixed-width RFC 3339 strings, so stored values order lexicographically.
pub(crate) mod expiry {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn truncate(at: DateTime<Utc>) -> DateTime<Utc> {
        at.trunc_subsecs(3)
    }

    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_some(&format(at)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<DateTime<Utc>>::deserialize(deserializer).map(|at| at.map(truncate))
    }
}

/// Coupon entity - represents a discount coupon stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Unique, always stored normalized
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    /// Informational only; not checked on validate or apply
    #[serde(default)]
    pub min_purchase: f64,
    /// `None` means unlimited
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub current_uses: u32,
    /// `None` means the coupon never expires
    #[serde(default, with = "expiry")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    pub fn new(input: CreateCoupon) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            code: normalize_code(&input.code),
            discount_type: input.discount_type,
            discount_value: input.discount_value,
            min_purchase: input.min_purchase,
            max_uses: input.max_uses,
            current_uses: 0,
            expiration_date: input.expiration_date.map(expiry::truncate),
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Evaluate the coupon against `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> CouponState {
        if !self.is_active {
            return CouponState::Inactive;
        }
        if self.expiration_date.is_some_and(|exp| exp < now) {
            return CouponState::Expired;
        }
        if self.max_uses.is_some_and(|max| self.current_uses >= max) {
            return CouponState::Exhausted;
        }
        CouponState::Valid
    }

    /// Merge an update; omitted fields keep their stored value.
    pub fn apply_update(&mut self, update: UpdateCoupon) {
        if let Some(code) = update.code {
            self.code = normalize_code(&code);
        }
        if let Some(discount_type) = update.discount_type {
            self.discount_type = discount_type;
        }
        if let Some(discount_value) = update.discount_value {
            self.discount_value = discount_value;
        }
        if let Some(min_purchase) = update.min_purchase {
            self.min_purchase = min_purchase;
        }
        if update.clear_max_uses {
            self.max_uses = None;
        } else if let Some(max_uses) = update.max_uses {
            self.max_uses = Some(max_uses);
        }
        if let Some(current_uses) = update.current_uses {
            self.current_uses = current_uses;
        }
        if update.clear_expiration_date {
            self.expiration_date = None;
        } else if let Some(expiration_date) = update.expiration_date {
            self.expiration_date = Some(expiry::truncate(expiration_date));
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}

/// DTO for creating a coupon. Usage always starts at zero.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCoupon {
    #[validate(length(min = 1, max = 50))]
    pub code: String,
    pub discount_type: DiscountType,
    #[validate(range(min = 0.0))]
    pub discount_value: f64,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub min_purchase: f64,
    #[serde(default)]
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// DTO for updating a coupon.
///
/// A `null` or missing field keeps the stored value. Use `clear_max_uses`
/// or `clear_expiration_date` to reset those back to unlimited / never.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCoupon {
    #[validate(length(min = 1, max = 50))]
    pub code: Option<String>,
    pub discount_type: Option<DiscountType>,
    #[validate(range(min = 0.0))]
    pub discount_value: Option<f64>,
    #[validate(range(min = 0.0))]
    pub min_purchase: Option<f64>,
    pub max_uses: Option<u32>,
    pub current_uses: Option<u32>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub clear_max_uses: bool,
    #[serde(default)]
    pub clear_expiration_date: bool,
}

/// Result of a successful validation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CouponValidation {
    pub valid: bool,
    pub coupon: Coupon,
    pub message: String,
}

/// Result of a successful application; `coupon` carries the new usage count
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CouponApplication {
    pub applied: bool,
    pub coupon: Coupon,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn coupon(max_uses: Option<u32>, current_uses: u32) -> Coupon {
        let mut coupon = Coupon::new(CreateCoupon {
            code: " save10 ".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10.0,
            min_purchase: 0.0,
            max_uses,
            expiration_date: None,
            is_active: true,
        });
        coupon.current_uses = current_uses;
        coupon
    }

    #[test]
    fn test_new_normalizes_code_and_resets_usage() {
        let c = coupon(Some(5), 0);
        assert_eq!(c.code, "SAVE10");
        assert_eq!(c.current_uses, 0);
        assert_eq!(c.created_at, c.updated_at);
    }

    #[test]
    fn test_inactive_wins_over_everything() {
        let mut c = coupon(Some(1), 1);
        c.is_active = false;
        c.expiration_date = Some(Utc::now() - Duration::days(1));
        assert_eq!(c.state_at(Utc::now()), CouponState::Inactive);
    }

    #[test]
    fn test_expired_even_when_under_cap() {
        let mut c = coupon(Some(10), 0);
        c.expiration_date = Some(Utc::now() - Duration::seconds(1));
        assert_eq!(c.state_at(Utc::now()), CouponState::Expired);
    }

    #[test]
    fn test_expiration_boundary_is_strict() {
        let now = Utc::now();
        let mut c = coupon(None, 0);
        c.expiration_date = Some(now);
        assert_eq!(c.state_at(now), CouponState::Valid);
    }

    #[test]
    fn test_usage_cap() {
        let now = Utc::now();
        assert_eq!(coupon(Some(3), 3).state_at(now), CouponState::Exhausted);
        assert_eq!(coupon(Some(3), 2).state_at(now), CouponState::Valid);
        assert_eq!(coupon(Some(0), 0).state_at(now), CouponState::Exhausted);
        assert_eq!(coupon(None, 10_000).state_at(now), CouponState::Valid);
    }

    #[test]
    fn test_state_of_missing_coupon_is_unknown() {
        assert_eq!(CouponState::of(None, Utc::now()), CouponState::Unknown);
    }

    #[test]
    fn test_apply_update_keeps_omitted_fields() {
        let mut c = coupon(Some(5), 2);
        c.apply_update(UpdateCoupon {
            code: Some("winter".to_string()),
            discount_value: Some(15.0),
            ..Default::default()
        });

        assert_eq!(c.code, "WINTER");
        assert_eq!(c.discount_value, 15.0);
        assert_eq!(c.max_uses, Some(5));
        assert_eq!(c.current_uses, 2);
        assert!(c.is_active);
    }

    #[test]
    fn test_apply_update_clear_flags() {
        let mut c = coupon(Some(5), 2);
        c.expiration_date = Some(Utc::now());
        c.apply_update(UpdateCoupon {
            max_uses: Some(99),
            clear_max_uses: true,
            clear_expiration_date: true,
            ..Default::default()
        });

        assert_eq!(c.max_uses, None);
        assert_eq!(c.expiration_date, None);
    }

    #[test]
    fn test_discount_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&DiscountType::Percentage).unwrap(),
            "\"percentage\""
        );
        assert!(serde_json::from_str::<DiscountType>("\"bogo\"").is_err());
    }

    #[test]
    fn test_expiration_is_written_with_fixed_millisecond_precision() {
        let mut c = coupon(None, 0);
        c.apply_update(UpdateCoupon {
            expiration_date: Some("2030-05-01T10:00:00.123456789Z".parse().unwrap()),
            ..Default::default()
        });

        let value = serde_json::to_value(&c).unwrap();
        assert_eq!(value["expiration_date"], "2030-05-01T10:00:00.123Z");

        let on_the_second: DateTime<Utc> = "2030-05-01T10:00:00Z".parse().unwrap();
        assert_eq!(expiry::format(&on_the_second), "2030-05-01T10:00:00.000Z");

        let back: Coupon = serde_json::from_value(value).unwrap();
        assert_eq!(back.expiration_date, c.expiration_date);
    }
}
