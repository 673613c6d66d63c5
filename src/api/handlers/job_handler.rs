//! Job posting handlers.
//!
//! Browsing is public; managing postings is admin only; applying is
//! open to any authenticated user and arrives as multipart because of
//! the resume file.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{
    broken_multipart, file_field, required, text_field, ValidatedJson,
};
use crate::api::AppState;
use crate::domain::{CurrentUser, Job, JobApplication, JobPatch, JobStatus, Upload};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::JobFilter;
use crate::services::{ApplyToJob, CreateJob};
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateJobRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Field Coordinator")]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub requirements: Option<String>,
    #[schema(example = "Addis Ababa")]
    pub location: Option<String>,
    /// Applications close at this instant; open-ended when omitted
    pub deadline: Option<DateTime<Utc>>,
}

/// Admin posting edit. `status` toggles open/closed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub status: Option<JobStatus>,
    /// When true, only postings currently accepting applications
    #[serde(default)]
    pub only_open: bool,
}

/// Token-free browsing routes.
pub fn public_job_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_jobs))
        .route("/:id", get(get_job))
}

/// Posting management and the application intake.
pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_job))
        .route("/:id", put(update_job).delete(delete_job))
        .route("/:id/apply", post(apply_to_job))
}

/// Browse postings
#[utoipa::path(
    get,
    path = "/jobs",
    tag = "Jobs",
    params(
        ("status" = Option<JobStatus>, Query, description = "Filter by open/closed"),
        ("only_open" = Option<bool>, Query, description = "Only postings accepting applications"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Paginated postings"))
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Job>>> {
    let filter = JobFilter {
        status: query.status,
        open_at: query.only_open.then(Utc::now),
    };

    let page = state.services.jobs().list(filter, pagination).await?;

    Ok(Json(page))
}

/// Fetch one posting
#[utoipa::path(
    get,
    path = "/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "The posting", body = Job),
        (status = 404, description = "No such posting")
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Job>> {
    let job = state.services.jobs().get(id).await?;

    Ok(Json(job))
}

/// Publish a posting (admin)
#[utoipa::path(
    post,
    path = "/jobs",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    request_body = CreateJobRequest,
    responses(
        (status = 201, description = "Published posting", body = Job),
        (status = 400, description = "Deadline already passed"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_job(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateJobRequest>,
) -> AppResult<Created<Job>> {
    let input = CreateJob {
        title: payload.title,
        description: payload.description,
        requirements: payload.requirements,
        location: payload.location,
        deadline: payload.deadline,
    };

    let job = state.services.jobs().create(&current, input).await?;

    Ok(Created(job))
}

/// Edit a posting (admin)
#[utoipa::path(
    put,
    path = "/jobs/{id}",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body = UpdateJobRequest,
    responses(
        (status = 200, description = "Updated posting", body = Job),
        (status = 400, description = "Deadline already passed"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such posting")
    )
)]
pub async fn update_job(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobRequest>,
) -> AppResult<Json<Job>> {
    let patch = JobPatch {
        title: payload.title,
        description: payload.description,
        requirements: payload.requirements,
        location: payload.location,
        deadline: payload.deadline,
        status: payload.status,
    };

    let job = state.services.jobs().update(&current, id, patch).await?;

    Ok(Json(job))
}

/// Delete a posting (admin)
#[utoipa::path(
    delete,
    path = "/jobs/{id}",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Job ID")),
    responses(
        (status = 200, description = "Posting deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such posting")
    )
)]
pub async fn delete_job(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.jobs().delete(&current, id).await?;

    Ok(ApiResponse::message("Posting deleted"))
}

/// Apply to a posting. The resume file is required.
#[utoipa::path(
    post,
    path = "/jobs/{id}/apply",
    tag = "Jobs",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Job ID")),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Filed application", body = JobApplication),
        (status = 400, description = "Missing field or posting no longer accepting"),
        (status = 404, description = "No such posting"),
        (status = 409, description = "Already applied to this posting")
    )
)]
pub async fn apply_to_job(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Created<JobApplication>> {
    let mut applicant_name: Option<String> = None;
    let mut applicant_email: Option<String> = None;
    let mut cover_letter: Option<String> = None;
    let mut resume: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await.map_err(broken_multipart)? {
        match field.name().unwrap_or_default() {
            "applicant_name" => applicant_name = Some(text_field(field).await?),
            "applicant_email" => applicant_email = Some(text_field(field).await?),
            "cover_letter" => cover_letter = Some(text_field(field).await?),
            "resume" => resume = Some(file_field(field).await?),
            _ => {}
        }
    }

    let input = ApplyToJob {
        job_id: id,
        applicant_name: required(applicant_name, "applicant_name")?,
        applicant_email: required(applicant_email, "applicant_email")?,
        cover_letter,
        resume: resume.ok_or_else(|| AppError::validation("Missing file: resume"))?,
    };

    let application = state.services.applications().apply(&current, input).await?;

    Ok(Created(application))
}
