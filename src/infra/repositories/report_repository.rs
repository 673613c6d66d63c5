//! Report repository.
//!
//! Status transitions are compare-and-set: the expected source status
//! is part of the UPDATE predicate, so losing a race means zero rows
//! touched rather than a silently overwritten decision.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::report::{self, ActiveModel, Entity as ReportEntity};
use super::scope::scope_condition;
use crate::domain::report::{NewReport, Report, ReportPatch};
use crate::domain::status::ReportStatus;
use crate::domain::AuthorityScope;
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub woreda_id: Option<Uuid>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn create(&self, new: NewReport) -> AppResult<Report>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>>;

    async fn list(
        &self,
        scope: AuthorityScope,
        filter: ReportFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Report>, u64)>;

    async fn update(&self, id: Uuid, patch: ReportPatch) -> AppResult<Report>;

    /// Compare-and-set status change. `false` means the row was not in
    /// `from` anymore (or gone).
    async fn transition(
        &self,
        id: Uuid,
        from: ReportStatus,
        to: ReportStatus,
    ) -> AppResult<bool>;

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;

    /// Duplicate guard: same title, description and geography chain.
    async fn exists_duplicate(
        &self,
        title: &str,
        description: &str,
        region_id: Uuid,
        zone_id: Uuid,
        woreda_id: Uuid,
    ) -> AppResult<bool>;
}

pub struct ReportStore {
    db: DatabaseConnection,
}

impl ReportStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn sort_column(params: &PaginationParams) -> report::Column {
        match params.sort_by.as_deref() {
            Some("title") => report::Column::Title,
            Some("status") => report::Column::Status,
            Some("updated_at") => report::Column::UpdatedAt,
            _ => report::Column::CreatedAt,
        }
    }
}

#[async_trait]
impl ReportRepository for ReportStore {
    async fn create(&self, new: NewReport) -> AppResult<Report> {
        let now = chrono::Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            description: Set(new.description),
            region_id: Set(new.region_id),
            zone_id: Set(new.zone_id),
            woreda_id: Set(new.woreda_id),
            image_url: Set(new.image_url),
            video_url: Set(new.video_url),
            status: Set(ReportStatus::Pending.as_str().to_string()),
            created_by: Set(new.created_by),
            is_deleted: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Report::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Report>> {
        let result = ReportEntity::find_by_id(id)
            .filter(report::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(Report::from))
    }

    async fn list(
        &self,
        scope: AuthorityScope,
        filter: ReportFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Report>, u64)> {
        let mut query = ReportEntity::find().filter(report::Column::IsDeleted.eq(false));

        if let Some(condition) = scope_condition(
            scope,
            report::Column::RegionId,
            report::Column::ZoneId,
            report::Column::WoredaId,
            report::Column::CreatedBy,
        ) {
            query = query.filter(condition);
        }
        if let Some(status) = filter.status {
            query = query.filter(report::Column::Status.eq(status.as_str()));
        }
        if let Some(woreda_id) = filter.woreda_id {
            query = query.filter(report::Column::WoredaId.eq(woreda_id));
        }

        let query = query.order_by(Self::sort_column(params), params.sort_order());
        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(Report::from).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: ReportPatch) -> AppResult<Report> {
        let found = ReportEntity::find_by_id(id)
            .filter(report::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Report")?;

        let mut active: ActiveModel = found.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(video_url) = patch.video_url {
            active.video_url = Set(Some(video_url));
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(Report::from(active.update(&self.db).await?))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: ReportStatus,
        to: ReportStatus,
    ) -> AppResult<bool> {
        let result = ReportEntity::update_many()
            .col_expr(report::Column::Status, Expr::value(to.as_str()))
            .col_expr(report::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(report::Column::Id.eq(id))
            .filter(report::Column::Status.eq(from.as_str()))
            .filter(report::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        let found = ReportEntity::find_by_id(id)
            .filter(report::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Report")?;

        let mut active: ActiveModel = found.into();
        let now = chrono::Utc::now();
        active.is_deleted = Set(true);
        active.deleted_by = Set(Some(deleted_by));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }

    async fn exists_duplicate(
        &self,
        title: &str,
        description: &str,
        region_id: Uuid,
        zone_id: Uuid,
        woreda_id: Uuid,
    ) -> AppResult<bool> {
        let count = ReportEntity::find()
            .filter(report::Column::Title.eq(title))
            .filter(report::Column::Description.eq(description))
            .filter(report::Column::RegionId.eq(region_id))
            .filter(report::Column::ZoneId.eq(zone_id))
            .filter(report::Column::WoredaId.eq(woreda_id))
            .filter(report::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
