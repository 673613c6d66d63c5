//! Partnership request repository.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::partnership;
use super::scope::owner_condition;
use crate::domain::partnership::{NewPartnership, Partnership, PartnershipPatch};
use crate::domain::status::PartnershipStatus;
use crate::domain::AuthorityScope;
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PartnershipRepository: Send + Sync {
    async fn create(&self, new: NewPartnership) -> AppResult<Partnership>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partnership>>;

    /// The user's request that has not reached a terminal status, if
    /// any. Used as the one-open-request guard.
    async fn find_open_for_user(&self, user_id: Uuid) -> AppResult<Option<Partnership>>;

    async fn list(
        &self,
        scope: AuthorityScope,
        status: Option<PartnershipStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Partnership>, u64)>;

    async fn update(&self, id: Uuid, patch: PartnershipPatch) -> AppResult<Partnership>;

    async fn transition(
        &self,
        id: Uuid,
        from: PartnershipStatus,
        to: PartnershipStatus,
    ) -> AppResult<bool>;

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;
}

pub struct PartnershipStore {
    db: DatabaseConnection,
}

impl PartnershipStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn open_statuses() -> Vec<&'static str> {
        [PartnershipStatus::Pending, PartnershipStatus::Reviewed]
            .iter()
            .map(|s| s.as_str())
            .collect()
    }
}

#[async_trait]
impl PartnershipRepository for PartnershipStore {
    async fn create(&self, new: NewPartnership) -> AppResult<Partnership> {
        let now = chrono::Utc::now();
        let model = partnership::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_name: Set(new.organization_name),
            organization_type: Set(new.organization_type),
            proposal: Set(new.proposal),
            website: Set(new.website),
            status: Set(PartnershipStatus::Pending.as_str().to_string()),
            created_by: Set(new.created_by),
            is_deleted: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Partnership::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Partnership>> {
        let result = partnership::Entity::find_by_id(id)
            .filter(partnership::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(Partnership::from))
    }

    async fn find_open_for_user(&self, user_id: Uuid) -> AppResult<Option<Partnership>> {
        let result = partnership::Entity::find()
            .filter(partnership::Column::CreatedBy.eq(user_id))
            .filter(partnership::Column::Status.is_in(Self::open_statuses()))
            .filter(partnership::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(Partnership::from))
    }

    async fn list(
        &self,
        scope: AuthorityScope,
        status: Option<PartnershipStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Partnership>, u64)> {
        let mut query =
            partnership::Entity::find().filter(partnership::Column::IsDeleted.eq(false));

        if let Some(condition) = owner_condition(scope, partnership::Column::CreatedBy) {
            query = query.filter(condition);
        }
        if let Some(status) = status {
            query = query.filter(partnership::Column::Status.eq(status.as_str()));
        }

        let query = query.order_by(partnership::Column::CreatedAt, params.sort_order());
        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(Partnership::from).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: PartnershipPatch) -> AppResult<Partnership> {
        let found = partnership::Entity::find_by_id(id)
            .filter(partnership::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Partnership request")?;

        let mut active: partnership::ActiveModel = found.into();
        if let Some(organization_name) = patch.organization_name {
            active.organization_name = Set(organization_name);
        }
        if let Some(organization_type) = patch.organization_type {
            active.organization_type = Set(organization_type);
        }
        if let Some(proposal) = patch.proposal {
            active.proposal = Set(proposal);
        }
        if let Some(website) = patch.website {
            active.website = Set(Some(website));
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(Partnership::from(active.update(&self.db).await?))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: PartnershipStatus,
        to: PartnershipStatus,
    ) -> AppResult<bool> {
        let result = partnership::Entity::update_many()
            .col_expr(partnership::Column::Status, Expr::value(to.as_str()))
            .col_expr(
                partnership::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(partnership::Column::Id.eq(id))
            .filter(partnership::Column::Status.eq(from.as_str()))
            .filter(partnership::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        let found = partnership::Entity::find_by_id(id)
            .filter(partnership::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Partnership request")?;

        let mut active: partnership::ActiveModel = found.into();
        let now = chrono::Utc::now();
        active.is_deleted = Set(true);
        active.deleted_by = Set(Some(deleted_by));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }
}
