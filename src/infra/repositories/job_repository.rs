//! Job posting and job application repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{job, job_application};
use super::scope::owner_condition;
use crate::domain::job::{
    ApplicationPatch, Job, JobApplication, JobPatch, NewApplication, NewJob,
};
use crate::domain::status::{ApplicationStatus, JobStatus};
use crate::domain::AuthorityScope;
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    /// When set, restrict to postings accepting applications at this
    /// instant: open status and deadline unset or in the future.
    pub open_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<Uuid>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, new: NewJob) -> AppResult<Job>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>>;

    async fn list(&self, filter: JobFilter, params: &PaginationParams)
        -> AppResult<(Vec<Job>, u64)>;

    async fn update(&self, id: Uuid, patch: JobPatch) -> AppResult<Job>;

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;

    /// Close every open posting whose deadline is at or before `now`.
    /// Returns the number of postings closed.
    async fn close_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait JobApplicationRepository: Send + Sync {
    async fn create(&self, new: NewApplication) -> AppResult<JobApplication>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobApplication>>;

    async fn list(
        &self,
        scope: AuthorityScope,
        filter: ApplicationFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<JobApplication>, u64)>;

    async fn update(&self, id: Uuid, patch: ApplicationPatch) -> AppResult<JobApplication>;

    async fn transition(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> AppResult<bool>;

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;

    /// Duplicate guard: one application per applicant email and job.
    async fn exists_for(&self, job_id: Uuid, applicant_email: &str) -> AppResult<bool>;
}

pub struct JobStore {
    db: DatabaseConnection,
}

impl JobStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobRepository for JobStore {
    async fn create(&self, new: NewJob) -> AppResult<Job> {
        let now = chrono::Utc::now();
        let model = job::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            description: Set(new.description),
            requirements: Set(new.requirements),
            location: Set(new.location),
            deadline: Set(new.deadline),
            status: Set(JobStatus::Open.as_str().to_string()),
            created_by: Set(new.created_by),
            is_deleted: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(Job::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        let result = job::Entity::find_by_id(id)
            .filter(job::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(Job::from))
    }

    async fn list(
        &self,
        filter: JobFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Job>, u64)> {
        let mut query = job::Entity::find().filter(job::Column::IsDeleted.eq(false));

        if let Some(status) = filter.status {
            query = query.filter(job::Column::Status.eq(status.as_str()));
        }
        if let Some(open_at) = filter.open_at {
            query = query.filter(job::Column::Status.eq(JobStatus::Open.as_str())).filter(
                Condition::any()
                    .add(job::Column::Deadline.is_null())
                    .add(job::Column::Deadline.gt(open_at)),
            );
        }

        let query = query.order_by(job::Column::CreatedAt, params.sort_order());
        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(Job::from).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: JobPatch) -> AppResult<Job> {
        let found = job::Entity::find_by_id(id)
            .filter(job::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Job")?;

        let mut active: job::ActiveModel = found.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(requirements) = patch.requirements {
            active.requirements = Set(Some(requirements));
        }
        if let Some(location) = patch.location {
            active.location = Set(Some(location));
        }
        if let Some(deadline) = patch.deadline {
            active.deadline = Set(Some(deadline));
        }
        if let Some(status) = patch.status {
            active.status = Set(status.as_str().to_string());
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(Job::from(active.update(&self.db).await?))
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        let found = job::Entity::find_by_id(id)
            .filter(job::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Job")?;

        let mut active: job::ActiveModel = found.into();
        let now = chrono::Utc::now();
        active.is_deleted = Set(true);
        active.deleted_by = Set(Some(deleted_by));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = job::Entity::update_many()
            .col_expr(job::Column::Status, Expr::value(JobStatus::Closed.as_str()))
            .col_expr(job::Column::UpdatedAt, Expr::value(now))
            .filter(job::Column::Status.eq(JobStatus::Open.as_str()))
            .filter(job::Column::Deadline.is_not_null())
            .filter(job::Column::Deadline.lte(now))
            .filter(job::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

pub struct JobApplicationStore {
    db: DatabaseConnection,
}

impl JobApplicationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobApplicationRepository for JobApplicationStore {
    async fn create(&self, new: NewApplication) -> AppResult<JobApplication> {
        let now = chrono::Utc::now();
        let model = job_application::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(new.job_id),
            applicant_name: Set(new.applicant_name),
            applicant_email: Set(new.applicant_email),
            resume_url: Set(new.resume_url),
            cover_letter: Set(new.cover_letter),
            status: Set(ApplicationStatus::Applied.as_str().to_string()),
            created_by: Set(new.created_by),
            is_deleted: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(JobApplication::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobApplication>> {
        let result = job_application::Entity::find_by_id(id)
            .filter(job_application::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(JobApplication::from))
    }

    async fn list(
        &self,
        scope: AuthorityScope,
        filter: ApplicationFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<JobApplication>, u64)> {
        let mut query =
            job_application::Entity::find().filter(job_application::Column::IsDeleted.eq(false));

        if let Some(condition) = owner_condition(scope, job_application::Column::CreatedBy) {
            query = query.filter(condition);
        }
        if let Some(status) = filter.status {
            query = query.filter(job_application::Column::Status.eq(status.as_str()));
        }
        if let Some(job_id) = filter.job_id {
            query = query.filter(job_application::Column::JobId.eq(job_id));
        }

        let query = query.order_by(job_application::Column::CreatedAt, params.sort_order());
        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(JobApplication::from).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: ApplicationPatch) -> AppResult<JobApplication> {
        let found = job_application::Entity::find_by_id(id)
            .filter(job_application::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Job application")?;

        let mut active: job_application::ActiveModel = found.into();
        if let Some(resume_url) = patch.resume_url {
            active.resume_url = Set(resume_url);
        }
        if let Some(cover_letter) = patch.cover_letter {
            active.cover_letter = Set(Some(cover_letter));
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(JobApplication::from(active.update(&self.db).await?))
    }

    async fn transition(
        &self,
        id: Uuid,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> AppResult<bool> {
        let result = job_application::Entity::update_many()
            .col_expr(job_application::Column::Status, Expr::value(to.as_str()))
            .col_expr(
                job_application::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(job_application::Column::Id.eq(id))
            .filter(job_application::Column::Status.eq(from.as_str()))
            .filter(job_application::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        let found = job_application::Entity::find_by_id(id)
            .filter(job_application::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Job application")?;

        let mut active: job_application::ActiveModel = found.into();
        let now = chrono::Utc::now();
        active.is_deleted = Set(true);
        active.deleted_by = Set(Some(deleted_by));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }

    async fn exists_for(&self, job_id: Uuid, applicant_email: &str) -> AppResult<bool> {
        let count = job_application::Entity::find()
            .filter(job_application::Column::JobId.eq(job_id))
            .filter(job_application::Column::ApplicantEmail.eq(applicant_email))
            .filter(job_application::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}
