//! Geography service: the Region → Zone → Woreda reference hierarchy.
//!
//! The hierarchy is admin-managed reference data; every lifecycle
//! entity claiming a chain goes through [`validate_chain`] at create
//! time.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{CurrentUser, Permission, Region, Woreda, Zone};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::GeographyRepository;

/// Validate a referenced geography chain against the store.
///
/// Present levels must exist and be strictly contained: zone in region,
/// woreda in zone. A lower level never appears without the level above
/// it.
pub(crate) async fn validate_chain(
    repo: &dyn GeographyRepository,
    region_id: Option<Uuid>,
    zone_id: Option<Uuid>,
    woreda_id: Option<Uuid>,
) -> AppResult<()> {
    if zone_id.is_some() && region_id.is_none() {
        return Err(AppError::validation("A zone reference requires its region"));
    }
    if woreda_id.is_some() && zone_id.is_none() {
        return Err(AppError::validation("A woreda reference requires its zone"));
    }

    if let Some(region_id) = region_id {
        if repo.find_region(region_id).await?.is_none() {
            return Err(AppError::validation("Referenced region does not exist"));
        }
    }
    if let Some(zone_id) = zone_id {
        let zone = repo
            .find_zone(zone_id)
            .await?
            .ok_or_else(|| AppError::validation("Referenced zone does not exist"))?;
        if Some(zone.region_id) != region_id {
            return Err(AppError::validation(
                "Zone does not belong to the given region",
            ));
        }
    }
    if let Some(woreda_id) = woreda_id {
        let woreda = repo
            .find_woreda(woreda_id)
            .await?
            .ok_or_else(|| AppError::validation("Referenced woreda does not exist"))?;
        if Some(woreda.zone_id) != zone_id {
            return Err(AppError::validation(
                "Woreda does not belong to the given zone",
            ));
        }
    }

    Ok(())
}

/// Hierarchy management and lookups.
#[async_trait]
pub trait GeographyService: Send + Sync {
    async fn create_region(&self, actor: &CurrentUser, name: String) -> AppResult<Region>;
    async fn rename_region(&self, actor: &CurrentUser, id: Uuid, name: String)
        -> AppResult<Region>;
    async fn delete_region(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
    async fn list_regions(&self) -> AppResult<Vec<Region>>;

    async fn create_zone(
        &self,
        actor: &CurrentUser,
        name: String,
        region_id: Uuid,
    ) -> AppResult<Zone>;
    async fn rename_zone(&self, actor: &CurrentUser, id: Uuid, name: String) -> AppResult<Zone>;
    async fn delete_zone(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
    /// List zones, optionally restricted to one region.
    async fn list_zones(&self, region_id: Option<Uuid>) -> AppResult<Vec<Zone>>;

    async fn create_woreda(
        &self,
        actor: &CurrentUser,
        name: String,
        zone_id: Uuid,
    ) -> AppResult<Woreda>;
    async fn rename_woreda(&self, actor: &CurrentUser, id: Uuid, name: String)
        -> AppResult<Woreda>;
    async fn delete_woreda(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
    /// List woredas, optionally restricted to one zone.
    async fn list_woredas(&self, zone_id: Option<Uuid>) -> AppResult<Vec<Woreda>>;
}

/// Concrete implementation of [`GeographyService`].
pub struct GeographyManager {
    repo: Arc<dyn GeographyRepository>,
}

impl GeographyManager {
    pub fn new(repo: Arc<dyn GeographyRepository>) -> Self {
        Self { repo }
    }
}

fn require_manage(actor: &CurrentUser) -> AppResult<()> {
    if !actor.allows(Permission::ManageGeography) {
        return Err(AppError::forbidden(
            "Only administrators may manage geography",
        ));
    }
    Ok(())
}

fn clean_name(name: String) -> AppResult<String> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    Ok(name)
}

#[async_trait]
impl GeographyService for GeographyManager {
    async fn create_region(&self, actor: &CurrentUser, name: String) -> AppResult<Region> {
        require_manage(actor)?;
        self.repo.create_region(clean_name(name)?).await
    }

    async fn rename_region(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        name: String,
    ) -> AppResult<Region> {
        require_manage(actor)?;
        self.repo.rename_region(id, clean_name(name)?).await
    }

    async fn delete_region(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_manage(actor)?;
        self.repo.delete_region(id).await
    }

    async fn list_regions(&self) -> AppResult<Vec<Region>> {
        self.repo.list_regions().await
    }

    async fn create_zone(
        &self,
        actor: &CurrentUser,
        name: String,
        region_id: Uuid,
    ) -> AppResult<Zone> {
        require_manage(actor)?;
        if self.repo.find_region(region_id).await?.is_none() {
            return Err(AppError::validation("Referenced region does not exist"));
        }
        self.repo.create_zone(clean_name(name)?, region_id).await
    }

    async fn rename_zone(&self, actor: &CurrentUser, id: Uuid, name: String) -> AppResult<Zone> {
        require_manage(actor)?;
        self.repo.rename_zone(id, clean_name(name)?).await
    }

    async fn delete_zone(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_manage(actor)?;
        self.repo.delete_zone(id).await
    }

    async fn list_zones(&self, region_id: Option<Uuid>) -> AppResult<Vec<Zone>> {
        self.repo.list_zones(region_id).await
    }

    async fn create_woreda(
        &self,
        actor: &CurrentUser,
        name: String,
        zone_id: Uuid,
    ) -> AppResult<Woreda> {
        require_manage(actor)?;
        if self.repo.find_zone(zone_id).await?.is_none() {
            return Err(AppError::validation("Referenced zone does not exist"));
        }
        self.repo.create_woreda(clean_name(name)?, zone_id).await
    }

    async fn rename_woreda(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        name: String,
    ) -> AppResult<Woreda> {
        require_manage(actor)?;
        self.repo.rename_woreda(id, clean_name(name)?).await
    }

    async fn delete_woreda(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_manage(actor)?;
        self.repo.delete_woreda(id).await
    }

    async fn list_woredas(&self, zone_id: Option<Uuid>) -> AppResult<Vec<Woreda>> {
        self.repo.list_woredas(zone_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockGeographyRepository;
    use chrono::Utc;

    fn region(id: Uuid) -> Region {
        Region {
            id,
            name: "Amhara".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn zone(id: Uuid, region_id: Uuid) -> Zone {
        Zone {
            id,
            name: "North Shewa".to_string(),
            region_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn woreda(id: Uuid, zone_id: Uuid) -> Woreda {
        Woreda {
            id,
            name: "Debre Berhan".to_string(),
            zone_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn chain_with_consistent_links_passes() {
        let region_id = Uuid::new_v4();
        let zone_id = Uuid::new_v4();
        let woreda_id = Uuid::new_v4();

        let mut repo = MockGeographyRepository::new();
        repo.expect_find_region()
            .returning(move |id| Ok(Some(region(id))));
        repo.expect_find_zone()
            .returning(move |id| Ok(Some(zone(id, region_id))));
        repo.expect_find_woreda()
            .returning(move |id| Ok(Some(woreda(id, zone_id))));

        let result =
            validate_chain(&repo, Some(region_id), Some(zone_id), Some(woreda_id)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn zone_from_another_region_is_rejected() {
        let region_id = Uuid::new_v4();
        let other_region = Uuid::new_v4();
        let zone_id = Uuid::new_v4();

        let mut repo = MockGeographyRepository::new();
        repo.expect_find_region()
            .returning(move |id| Ok(Some(region(id))));
        repo.expect_find_zone()
            .returning(move |id| Ok(Some(zone(id, other_region))));

        let result = validate_chain(&repo, Some(region_id), Some(zone_id), None).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn lower_level_without_upper_is_rejected() {
        let repo = MockGeographyRepository::new();
        let result = validate_chain(&repo, None, Some(Uuid::new_v4()), None).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_region_is_rejected() {
        let mut repo = MockGeographyRepository::new();
        repo.expect_find_region().returning(|_| Ok(None));

        let result = validate_chain(&repo, Some(Uuid::new_v4()), None, None).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }
}
