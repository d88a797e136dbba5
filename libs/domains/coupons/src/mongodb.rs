//! MongoDB implementation of CouponRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::mongodb::{is_duplicate_key, uuid_as_bson};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Bson, Document, doc, to_bson},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CouponError, CouponResult};
use crate::models::{Coupon, expiry};
use crate::repository::CouponRepository;

pub struct MongoCouponRepository {
    collection: Collection<Coupon>,
}

impl MongoCouponRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Coupon>("coupons");
        Self { collection }
    }

    /// Create the unique code index
    pub async fn init_indexes(&self) -> CouponResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "code": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_code_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Coupon indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_as_bson(&id) }
    }

    /// Matches the coupon only while it is usable at `now`
    fn usage_guard(id: Uuid, now: DateTime<Utc>) -> Document {
        doc! {
            "_id": uuid_as_bson(&id),
            "is_active": true,
            "$and": [
                {
                    "$or": [
                        { "max_uses": Bson::Null },
                        { "$expr": { "$lt": ["$current_uses", "$max_uses"] } },
                    ]
                },
                {
                    "$or": [
                        { "expiration_date": Bson::Null },
                        { "expiration_date": { "$gte": expiry::format(&now) } },
                    ]
                },
            ],
        }
    }
}

#[async_trait]
impl CouponRepository for MongoCouponRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> CouponResult<Vec<Coupon>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let coupons: Vec<Coupon> = cursor.try_collect().await?;

        Ok(coupons)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> CouponResult<Option<Coupon>> {
        let coupon = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(coupon)
    }

    #[instrument(skip(self))]
    async fn get_by_code(&self, code: &str) -> CouponResult<Option<Coupon>> {
        let coupon = self.collection.find_one(doc! { "code": code }).await?;
        Ok(coupon)
    }

    #[instrument(skip(self, coupon), fields(code = %coupon.code))]
    async fn create(&self, coupon: Coupon) -> CouponResult<Coupon> {
        match self.collection.insert_one(&coupon).await {
            Ok(_) => {
                tracing::info!(coupon_id = %coupon.id, "Coupon created successfully");
                Ok(coupon)
            }
            Err(e) if is_duplicate_key(&e) => Err(CouponError::DuplicateCode(coupon.code)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, coupon), fields(coupon_id = %coupon.id))]
    async fn update(&self, coupon: Coupon) -> CouponResult<Coupon> {
        let result = match self
            .collection
            .replace_one(Self::id_filter(coupon.id), &coupon)
            .await
        {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => return Err(CouponError::DuplicateCode(coupon.code)),
            Err(e) => return Err(e.into()),
        };

        if result.matched_count == 0 {
            return Err(CouponError::NotFound);
        }

        tracing::info!("Coupon updated successfully");
        Ok(coupon)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> CouponResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn increment_usage(&self, id: Uuid) -> CouponResult<Option<Coupon>> {
        let now = Utc::now();
        let filter = Self::usage_guard(id, now);
        let updated_at = to_bson(&now).unwrap_or(Bson::Null);
        let update = doc! {
            "$inc": { "current_uses": 1 },
            "$set": { "updated_at": updated_at },
        };

        let coupon = self
            .collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(coupon)
    }
}
