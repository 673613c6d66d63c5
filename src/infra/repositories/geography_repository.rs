//! Geography repository: regions, zones and woredas.
//!
//! Reference data; rows are hard rows with FK RESTRICT, so deleting a
//! node that still has children or referencing entities surfaces as a
//! constraint violation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{region, woreda, zone};
use crate::domain::{Region, Woreda, Zone};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait GeographyRepository: Send + Sync {
    async fn create_region(&self, name: String) -> AppResult<Region>;
    async fn rename_region(&self, id: Uuid, name: String) -> AppResult<Region>;
    async fn delete_region(&self, id: Uuid) -> AppResult<()>;
    async fn find_region(&self, id: Uuid) -> AppResult<Option<Region>>;
    async fn list_regions(&self) -> AppResult<Vec<Region>>;

    async fn create_zone(&self, name: String, region_id: Uuid) -> AppResult<Zone>;
    async fn rename_zone(&self, id: Uuid, name: String) -> AppResult<Zone>;
    async fn delete_zone(&self, id: Uuid) -> AppResult<()>;
    async fn find_zone(&self, id: Uuid) -> AppResult<Option<Zone>>;
    /// Zones of one region, or all zones when `region_id` is `None`.
    async fn list_zones(&self, region_id: Option<Uuid>) -> AppResult<Vec<Zone>>;

    async fn create_woreda(&self, name: String, zone_id: Uuid) -> AppResult<Woreda>;
    async fn rename_woreda(&self, id: Uuid, name: String) -> AppResult<Woreda>;
    async fn delete_woreda(&self, id: Uuid) -> AppResult<()>;
    async fn find_woreda(&self, id: Uuid) -> AppResult<Option<Woreda>>;
    async fn list_woredas(&self, zone_id: Option<Uuid>) -> AppResult<Vec<Woreda>>;
}

pub struct GeographyStore {
    db: DatabaseConnection,
}

impl GeographyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl GeographyRepository for GeographyStore {
    async fn create_region(&self, name: String) -> AppResult<Region> {
        let now = chrono::Utc::now();
        let model = region::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Region::from(model))
    }

    async fn rename_region(&self, id: Uuid, name: String) -> AppResult<Region> {
        let found = region::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Region")?;

        let mut active: region::ActiveModel = found.into();
        active.name = Set(name);
        active.updated_at = Set(chrono::Utc::now());

        Ok(Region::from(active.update(&self.db).await?))
    }

    async fn delete_region(&self, id: Uuid) -> AppResult<()> {
        let result = region::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Region"));
        }
        Ok(())
    }

    async fn find_region(&self, id: Uuid) -> AppResult<Option<Region>> {
        let result = region::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Region::from))
    }

    async fn list_regions(&self) -> AppResult<Vec<Region>> {
        let models = region::Entity::find()
            .order_by_asc(region::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Region::from).collect())
    }

    async fn create_zone(&self, name: String, region_id: Uuid) -> AppResult<Zone> {
        let now = chrono::Utc::now();
        let model = zone::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            region_id: Set(region_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Zone::from(model))
    }

    async fn rename_zone(&self, id: Uuid, name: String) -> AppResult<Zone> {
        let found = zone::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Zone")?;

        let mut active: zone::ActiveModel = found.into();
        active.name = Set(name);
        active.updated_at = Set(chrono::Utc::now());

        Ok(Zone::from(active.update(&self.db).await?))
    }

    async fn delete_zone(&self, id: Uuid) -> AppResult<()> {
        let result = zone::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Zone"));
        }
        Ok(())
    }

    async fn find_zone(&self, id: Uuid) -> AppResult<Option<Zone>> {
        let result = zone::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Zone::from))
    }

    async fn list_zones(&self, region_id: Option<Uuid>) -> AppResult<Vec<Zone>> {
        let mut query = zone::Entity::find();
        if let Some(region_id) = region_id {
            query = query.filter(zone::Column::RegionId.eq(region_id));
        }

        let models = query.order_by_asc(zone::Column::Name).all(&self.db).await?;
        Ok(models.into_iter().map(Zone::from).collect())
    }

    async fn create_woreda(&self, name: String, zone_id: Uuid) -> AppResult<Woreda> {
        let now = chrono::Utc::now();
        let model = woreda::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            zone_id: Set(zone_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Woreda::from(model))
    }

    async fn rename_woreda(&self, id: Uuid, name: String) -> AppResult<Woreda> {
        let found = woreda::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Woreda")?;

        let mut active: woreda::ActiveModel = found.into();
        active.name = Set(name);
        active.updated_at = Set(chrono::Utc::now());

        Ok(Woreda::from(active.update(&self.db).await?))
    }

    async fn delete_woreda(&self, id: Uuid) -> AppResult<()> {
        let result = woreda::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Woreda"));
        }
        Ok(())
    }

    async fn find_woreda(&self, id: Uuid) -> AppResult<Option<Woreda>> {
        let result = woreda::Entity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Woreda::from))
    }

    async fn list_woredas(&self, zone_id: Option<Uuid>) -> AppResult<Vec<Woreda>> {
        let mut query = woreda::Entity::find();
        if let Some(zone_id) = zone_id {
            query = query.filter(woreda::Column::ZoneId.eq(zone_id));
        }

        let models = query
            .order_by_asc(woreda::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Woreda::from).collect())
    }
}
