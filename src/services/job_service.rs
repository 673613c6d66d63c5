//! Job postings and the applications filed against them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::job::{
    ApplicationPatch, Job, JobApplication, JobPatch, NewApplication, NewJob,
};
use crate::domain::status::{ApplicationStatus, StatusFlow};
use crate::domain::{AuthorityScope, CurrentUser, EntityKind, Permission, Upload};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    ApplicationFilter, JobApplicationRepository, JobFilter, JobRepository, UserRepository,
};
use crate::infra::AssetStore;
use crate::jobs::Notifier;
use crate::types::{Paginated, PaginationParams};

use super::notify::notify_owner;

/// Fields for publishing a posting.
#[derive(Debug, Clone)]
pub struct CreateJob {
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Fields for filing an application.
#[derive(Debug, Clone)]
pub struct ApplyToJob {
    pub job_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub cover_letter: Option<String>,
    pub resume: Upload,
}

/// Posting management and the public browsing surface.
#[async_trait]
pub trait JobService: Send + Sync {
    async fn create(&self, actor: &CurrentUser, input: CreateJob) -> AppResult<Job>;

    /// Public: anyone may read a posting, open or closed.
    async fn get(&self, id: Uuid) -> AppResult<Job>;

    /// Public listing.
    async fn list(&self, filter: JobFilter, params: PaginationParams)
        -> AppResult<Paginated<Job>>;

    /// Admin edit, including the open/closed flag.
    async fn update(&self, actor: &CurrentUser, id: Uuid, patch: JobPatch) -> AppResult<Job>;

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;

    /// Close open postings whose deadline has passed. Returns how many
    /// were closed.
    async fn close_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Application lifecycle operations.
#[async_trait]
pub trait ApplicationService: Send + Sync {
    async fn apply(&self, current: &CurrentUser, input: ApplyToJob) -> AppResult<JobApplication>;

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<JobApplication>;

    /// Reviewers see every application, everyone else their own.
    async fn list(
        &self,
        current: &CurrentUser,
        filter: ApplicationFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<JobApplication>>;

    /// Applicant edit while the application is still at the applied
    /// stage. A new resume replaces the stored file.
    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        patch: ApplicationPatch,
        resume: Option<Upload>,
    ) -> AppResult<JobApplication>;

    /// Applicant withdrawal while still at the applied stage. The
    /// stored resume is removed.
    async fn withdraw_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<()>;

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: ApplicationStatus,
    ) -> AppResult<JobApplication>;

    /// Reviewer delete. The stored resume is removed.
    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
}

fn require_manage(actor: &CurrentUser) -> AppResult<()> {
    if !actor.allows(Permission::ManageJobs) {
        return Err(AppError::forbidden("Only administrators may manage postings"));
    }
    Ok(())
}

fn require_review(actor: &CurrentUser) -> AppResult<()> {
    if !actor.allows(Permission::ReviewApplications) {
        return Err(AppError::forbidden("You may not review applications"));
    }
    Ok(())
}

fn check_deadline(deadline: Option<DateTime<Utc>>) -> AppResult<()> {
    if let Some(deadline) = deadline {
        if deadline <= Utc::now() {
            return Err(AppError::validation("Deadline must be in the future"));
        }
    }
    Ok(())
}

/// Concrete implementation of [`JobService`].
pub struct JobManager {
    jobs: Arc<dyn JobRepository>,
}

impl JobManager {
    pub fn new(jobs: Arc<dyn JobRepository>) -> Self {
        Self { jobs }
    }
}

#[async_trait]
impl JobService for JobManager {
    async fn create(&self, actor: &CurrentUser, input: CreateJob) -> AppResult<Job> {
        require_manage(actor)?;
        check_deadline(input.deadline)?;

        let job = self
            .jobs
            .create(NewJob {
                title: input.title,
                description: input.description,
                requirements: input.requirements,
                location: input.location,
                deadline: input.deadline,
                created_by: actor.id,
            })
            .await?;

        tracing::info!(job_id = %job.id, title = %job.title, "Job posting published");

        Ok(job)
    }

    async fn get(&self, id: Uuid) -> AppResult<Job> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Job"))
    }

    async fn list(
        &self,
        filter: JobFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Job>> {
        let (jobs, total) = self.jobs.list(filter, &params).await?;
        Ok(Paginated::new(jobs, params.page, params.limit(), total))
    }

    async fn update(&self, actor: &CurrentUser, id: Uuid, patch: JobPatch) -> AppResult<Job> {
        require_manage(actor)?;
        check_deadline(patch.deadline)?;

        // Force a not-found before the update touches anything.
        self.get(id).await?;

        self.jobs.update(id, patch).await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_manage(actor)?;
        self.get(id).await?;
        self.jobs.soft_delete(id, actor.id).await?;

        tracing::info!(job_id = %id, "Job posting deleted");

        Ok(())
    }

    async fn close_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let closed = self.jobs.close_expired(now).await?;
        if closed > 0 {
            tracing::info!(closed, "Closed postings past their deadline");
        }
        Ok(closed)
    }
}

/// Concrete implementation of [`ApplicationService`].
pub struct ApplicationManager {
    applications: Arc<dyn JobApplicationRepository>,
    jobs: Arc<dyn JobRepository>,
    users: Arc<dyn UserRepository>,
    assets: Arc<dyn AssetStore>,
    notifier: Arc<dyn Notifier>,
}

impl ApplicationManager {
    pub fn new(
        applications: Arc<dyn JobApplicationRepository>,
        jobs: Arc<dyn JobRepository>,
        users: Arc<dyn UserRepository>,
        assets: Arc<dyn AssetStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            applications,
            jobs,
            users,
            assets,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<JobApplication> {
        self.applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Job application"))
    }

    async fn purge_resume(&self, url: &str) {
        if let Err(err) = self.assets.delete(url).await {
            tracing::warn!(error = %err, url, "Failed to remove stored resume");
        }
    }

    /// Posting title for the status email; the posting may have been
    /// deleted since the application was filed.
    async fn posting_title(&self, job_id: Uuid) -> String {
        match self.jobs.find_by_id(job_id).await {
            Ok(Some(job)) => job.title,
            _ => "a removed posting".to_string(),
        }
    }
}

#[async_trait]
impl ApplicationService for ApplicationManager {
    async fn apply(&self, current: &CurrentUser, input: ApplyToJob) -> AppResult<JobApplication> {
        let job = self
            .jobs
            .find_by_id(input.job_id)
            .await?
            .ok_or_else(|| AppError::not_found("Job"))?;

        if !job.accepts_applications(Utc::now()) {
            return Err(AppError::validation(
                "This posting is no longer accepting applications",
            ));
        }

        if self
            .applications
            .exists_for(job.id, &input.applicant_email)
            .await?
        {
            return Err(AppError::conflict("Application"));
        }

        let resume_url = self
            .assets
            .store(input.resume.bytes, &input.resume.file_name)
            .await?;

        let application = self
            .applications
            .create(NewApplication {
                job_id: job.id,
                applicant_name: input.applicant_name,
                applicant_email: input.applicant_email,
                resume_url,
                cover_letter: input.cover_letter,
                created_by: current.id,
            })
            .await?;

        tracing::info!(
            application_id = %application.id,
            job_id = %job.id,
            "Application filed"
        );

        Ok(application)
    }

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<JobApplication> {
        let application = self.load(id).await?;
        if application.created_by != current.id
            && !current.allows(Permission::ReviewApplications)
        {
            return Err(AppError::not_found("Job application"));
        }
        Ok(application)
    }

    async fn list(
        &self,
        current: &CurrentUser,
        filter: ApplicationFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<JobApplication>> {
        let scope = if current.allows(Permission::ReviewApplications) {
            AuthorityScope::All
        } else {
            AuthorityScope::Own(current.id)
        };

        let (applications, total) = self.applications.list(scope, filter, &params).await?;
        Ok(Paginated::new(
            applications,
            params.page,
            params.limit(),
            total,
        ))
    }

    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        mut patch: ApplicationPatch,
        resume: Option<Upload>,
    ) -> AppResult<JobApplication> {
        let application = self.load(id).await?;

        if application.created_by != current.id {
            return Err(AppError::forbidden(
                "Only the applicant may edit this application",
            ));
        }
        if !application.status.editable_by_owner() {
            return Err(AppError::not_editable(application.status));
        }

        if let Some(upload) = resume {
            patch.resume_url = Some(self.assets.store(upload.bytes, &upload.file_name).await?);
        }

        let updated = self.applications.update(id, patch).await?;

        if updated.resume_url != application.resume_url {
            self.purge_resume(&application.resume_url).await;
        }

        Ok(updated)
    }

    async fn withdraw_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<()> {
        let application = self.load(id).await?;

        if application.created_by != current.id {
            return Err(AppError::forbidden(
                "Only the applicant may withdraw this application",
            ));
        }
        if !application.status.editable_by_owner() {
            return Err(AppError::not_editable(application.status));
        }

        self.applications.soft_delete(id, current.id).await?;
        self.purge_resume(&application.resume_url).await;

        tracing::info!(application_id = %id, "Application withdrawn");

        Ok(())
    }

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: ApplicationStatus,
    ) -> AppResult<JobApplication> {
        require_review(actor)?;

        let application = self.load(id).await?;

        application.status.transition(to)?;

        let moved = self.applications.transition(id, application.status, to).await?;
        if !moved {
            return Err(AppError::invalid_transition(application.status, to));
        }

        if to.notifies_owner() {
            let title = self.posting_title(application.job_id).await;
            notify_owner(
                self.users.as_ref(),
                self.notifier.as_ref(),
                application.created_by,
                EntityKind::JobApplication,
                &title,
                to.as_str(),
            )
            .await;
        }

        tracing::info!(
            application_id = %id,
            from = %application.status,
            to = %to,
            "Application transitioned"
        );

        self.load(id).await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_review(actor)?;

        let application = self.load(id).await?;
        self.applications.soft_delete(id, actor.id).await?;
        self.purge_resume(&application.resume_url).await;

        tracing::info!(application_id = %id, "Application deleted");

        Ok(())
    }
}
