//! MongoDB implementation of RoleRepository

use async_trait::async_trait;
use database::mongodb::{is_duplicate_key, uuid_as_bson, uuids_as_bson};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{RoleError, RoleResult};
use crate::models::Role;
use crate::repository::RoleRepository;

pub struct MongoRoleRepository {
    collection: Collection<Role>,
}

impl MongoRoleRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection::<Role>("roles");
        Self { collection }
    }

    pub async fn init_indexes(&self) -> RoleResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("idx_name_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("Role indexes created successfully");
        Ok(())
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": uuid_as_bson(&id) }
    }
}

#[async_trait]
impl RoleRepository for MongoRoleRepository {
    #[instrument(skip(self))]
    async fn list(&self) -> RoleResult<Vec<Role>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();
        let cursor = self.collection.find(doc! {}).with_options(options).await?;
        let roles: Vec<Role> = cursor.try_collect().await?;
        Ok(roles)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> RoleResult<Option<Role>> {
        let role = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(role)
    }

    #[instrument(skip(self))]
    async fn get_by_ids(&self, ids: &[Uuid]) -> RoleResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let filter = doc! { "_id": { "$in": uuids_as_bson(ids) } };
        let cursor = self.collection.find(filter).await?;
        let roles: Vec<Role> = cursor.try_collect().await?;
        Ok(roles)
    }

    #[instrument(skip(self))]
    async fn get_by_name(&self, name: &str) -> RoleResult<Option<Role>> {
        let role = self.collection.find_one(doc! { "name": name }).await?;
        Ok(role)
    }

    #[instrument(skip(self, role), fields(name = %role.name))]
    async fn create(&self, role: Role) -> RoleResult<Role> {
        match self.collection.insert_one(&role).await {
            Ok(_) => {
                tracing::info!(role_id = %role.id, "Role created successfully");
                Ok(role)
            }
            Err(e) if is_duplicate_key(&e) => Err(RoleError::DuplicateName(role.name)),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, role), fields(role_id = %role.id))]
    async fn update(&self, role: Role) -> RoleResult<Role> {
        let result = match self
            .collection
            .replace_one(Self::id_filter(role.id), &role)
            .await
        {
            Ok(result) => result,
            Err(e) if is_duplicate_key(&e) => return Err(RoleError::DuplicateName(role.name)),
            Err(e) => return Err(e.into()),
        };

        if result.matched_count == 0 {
            return Err(RoleError::NotFound);
        }
        Ok(role)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> RoleResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateRole;

    fn stored_id(role: &Role) -> mongodb::bson::Bson {
        let raw = mongodb::bson::to_raw_document_buf(role).unwrap();
        let stored: Document = mongodb::bson::from_slice(raw.as_bytes()).unwrap();
        stored.get("_id").cloned().unwrap()
    }

    #[test]
    fn test_id_filters_match_stored_ids() {
        let admin = Role::new(CreateRole {
            name: "admin".to_string(),
            description: None,
        });
        let customer = Role::new(CreateRole {
            name: "customer".to_string(),
            description: None,
        });

        let filter = MongoRoleRepository::id_filter(admin.id);
        assert_eq!(filter.get("_id"), Some(&stored_id(&admin)));

        let ids = uuids_as_bson(&[admin.id, customer.id]);
        assert_eq!(ids, vec![stored_id(&admin), stored_id(&customer)]);
    }
}
