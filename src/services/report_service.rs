//! Report service: the citizen report lifecycle.
//!
//! Reports follow pending → open → in_progress → resolved, with a
//! pending-only cancel. Owners may edit while pending; staff progress
//! them within their geographic scope.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::report::{NewReport, Report, ReportPatch};
use crate::domain::status::{ReportStatus, StatusFlow};
use crate::domain::{CurrentUser, EntityKind, Permission, Upload};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    GeographyRepository, ReportFilter, ReportRepository, UserRepository,
};
use crate::infra::AssetStore;
use crate::jobs::Notifier;
use crate::types::{Paginated, PaginationParams};

use super::geography_service::validate_chain;
use super::notify::notify_owner;

/// Fields for filing a report, before ownership is attached.
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub title: String,
    pub description: String,
    pub region_id: Uuid,
    pub zone_id: Uuid,
    pub woreda_id: Uuid,
    pub image: Option<Upload>,
    pub video: Option<Upload>,
}

/// Report lifecycle operations.
#[async_trait]
pub trait ReportService: Send + Sync {
    /// File a new report for the calling user.
    async fn create(&self, current: &CurrentUser, input: CreateReport) -> AppResult<Report>;

    /// Fetch one report the caller is allowed to see.
    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<Report>;

    /// List reports inside the caller's scope.
    async fn list(
        &self,
        current: &CurrentUser,
        filter: ReportFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Report>>;

    /// Owner edit, only while the report is still pending. Fresh
    /// uploads replace the stored attachment URLs.
    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        patch: ReportPatch,
        image: Option<Upload>,
        video: Option<Upload>,
    ) -> AppResult<Report>;

    /// Owner cancel, only while the report is still pending.
    async fn cancel_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<Report>;

    /// Staff status transition within geographic scope.
    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: ReportStatus,
    ) -> AppResult<Report>;

    /// Staff soft delete. Attachments are retained.
    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of [`ReportService`].
pub struct ReportManager {
    reports: Arc<dyn ReportRepository>,
    users: Arc<dyn UserRepository>,
    geography: Arc<dyn GeographyRepository>,
    assets: Arc<dyn AssetStore>,
    notifier: Arc<dyn Notifier>,
}

impl ReportManager {
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        users: Arc<dyn UserRepository>,
        geography: Arc<dyn GeographyRepository>,
        assets: Arc<dyn AssetStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            reports,
            users,
            geography,
            assets,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<Report> {
        self.reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Report"))
    }

    /// Owners see their own rows; staff see rows inside their scope.
    /// Everything else resolves to not-found so existence never leaks.
    fn visible_to(current: &CurrentUser, report: &Report) -> bool {
        report.created_by == current.id || current.scope().contains(&report.geo_ref())
    }
}

#[async_trait]
impl ReportService for ReportManager {
    async fn create(&self, current: &CurrentUser, input: CreateReport) -> AppResult<Report> {
        validate_chain(
            self.geography.as_ref(),
            Some(input.region_id),
            Some(input.zone_id),
            Some(input.woreda_id),
        )
        .await?;

        if self
            .reports
            .exists_duplicate(
                &input.title,
                &input.description,
                input.region_id,
                input.zone_id,
                input.woreda_id,
            )
            .await?
        {
            return Err(AppError::conflict("Report"));
        }

        let image_url = match input.image {
            Some(upload) => Some(self.assets.store(upload.bytes, &upload.file_name).await?),
            None => None,
        };
        let video_url = match input.video {
            Some(upload) => Some(self.assets.store(upload.bytes, &upload.file_name).await?),
            None => None,
        };

        let report = self
            .reports
            .create(NewReport {
                title: input.title,
                description: input.description,
                region_id: input.region_id,
                zone_id: input.zone_id,
                woreda_id: input.woreda_id,
                image_url,
                video_url,
                created_by: current.id,
            })
            .await?;

        tracing::info!(report_id = %report.id, "Report filed");

        Ok(report)
    }

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<Report> {
        let report = self.load(id).await?;
        if !Self::visible_to(current, &report) {
            return Err(AppError::not_found("Report"));
        }
        Ok(report)
    }

    async fn list(
        &self,
        current: &CurrentUser,
        filter: ReportFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Report>> {
        let (reports, total) = self.reports.list(current.scope(), filter, &params).await?;
        Ok(Paginated::new(reports, params.page, params.limit(), total))
    }

    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        mut patch: ReportPatch,
        image: Option<Upload>,
        video: Option<Upload>,
    ) -> AppResult<Report> {
        let report = self.load(id).await?;

        if report.created_by != current.id {
            return Err(AppError::forbidden("Only the reporter may edit this report"));
        }
        if !report.status.editable_by_owner() {
            return Err(AppError::not_editable(report.status));
        }

        // Replaced attachments stay in the store; report evidence is
        // never purged.
        if let Some(upload) = image {
            patch.image_url = Some(self.assets.store(upload.bytes, &upload.file_name).await?);
        }
        if let Some(upload) = video {
            patch.video_url = Some(self.assets.store(upload.bytes, &upload.file_name).await?);
        }

        self.reports.update(id, patch).await
    }

    async fn cancel_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<Report> {
        let report = self.load(id).await?;

        if report.created_by != current.id {
            return Err(AppError::forbidden(
                "Only the reporter may cancel this report",
            ));
        }
        if !report.status.editable_by_owner() {
            return Err(AppError::not_editable(report.status));
        }

        // Conditional update: a staff transition racing this cancel wins
        // or loses atomically.
        let moved = self
            .reports
            .transition(id, report.status, ReportStatus::Cancelled)
            .await?;
        if !moved {
            return Err(AppError::invalid_transition(
                report.status,
                ReportStatus::Cancelled,
            ));
        }

        self.load(id).await
    }

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: ReportStatus,
    ) -> AppResult<Report> {
        if !actor.allows(Permission::ReviewReports) {
            return Err(AppError::forbidden("You may not review reports"));
        }

        let report = self.load(id).await?;

        if !actor.scope().contains(&report.geo_ref()) {
            return Err(AppError::forbidden(
                "This report is outside your administrative area",
            ));
        }

        report.status.transition(to)?;

        let moved = self.reports.transition(id, report.status, to).await?;
        if !moved {
            // A concurrent reviewer got there first.
            return Err(AppError::invalid_transition(report.status, to));
        }

        if to.notifies_owner() {
            notify_owner(
                self.users.as_ref(),
                self.notifier.as_ref(),
                report.created_by,
                EntityKind::Report,
                &report.title,
                to.as_str(),
            )
            .await;
        }

        tracing::info!(report_id = %id, from = %report.status, to = %to, "Report transitioned");

        self.load(id).await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        if !actor.allows(Permission::ReviewReports) {
            return Err(AppError::forbidden("You may not review reports"));
        }

        let report = self.load(id).await?;

        if !actor.scope().contains(&report.geo_ref()) {
            return Err(AppError::forbidden(
                "This report is outside your administrative area",
            ));
        }

        // Evidence attachments are retained.
        self.reports.soft_delete(id, actor.id).await?;

        tracing::info!(report_id = %id, "Report deleted");

        Ok(())
    }
}
