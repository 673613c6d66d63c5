//! Job application handlers.
//!
//! Intake lives on the jobs router (`POST /jobs/{id}/apply`); this
//! router covers everything after: review listings, applicant edits
//! and withdrawal, reviewer transitions and deletes.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{broken_multipart, file_field, text_field};
use crate::api::AppState;
use crate::domain::{
    ApplicationPatch, ApplicationStatus, CurrentUser, JobApplication, Permission, Upload,
};
use crate::errors::AppResult;
use crate::infra::repositories::ApplicationFilter;
use crate::types::{ApiResponse, Paginated, PaginationParams};

/// Reviewer transition payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplicationStatusRequest {
    pub status: ApplicationStatus,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<Uuid>,
}

pub fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_applications))
        .route(
            "/:id",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
        .route("/:id/status", post(transition_application))
}

/// List applications: all for reviewers, own for applicants
#[utoipa::path(
    get,
    path = "/applications",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<ApplicationStatus>, Query, description = "Filter by status"),
        ("job_id" = Option<Uuid>, Query, description = "Filter by posting"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Paginated applications"))
)]
pub async fn list_applications(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<JobApplication>>> {
    let filter = ApplicationFilter {
        status: query.status,
        job_id: query.job_id,
    };

    let page = state
        .services
        .applications()
        .list(&current, filter, pagination)
        .await?;

    Ok(Json(page))
}

/// Fetch one application
#[utoipa::path(
    get,
    path = "/applications/{id}",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "The application", body = JobApplication),
        (status = 404, description = "Not found or not the caller's")
    )
)]
pub async fn get_application(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobApplication>> {
    let application = state.services.applications().get(&current, id).await?;

    Ok(Json(application))
}

/// Applicant edit while still at the applied stage. A new resume file
/// replaces the stored one.
#[utoipa::path(
    put,
    path = "/applications/{id}",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated application", body = JobApplication),
        (status = 403, description = "Not the applicant"),
        (status = 409, description = "Already under review")
    )
)]
pub async fn update_application(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<Json<JobApplication>> {
    let mut cover_letter: Option<String> = None;
    let mut resume: Option<Upload> = None;

    while let Some(field) = multipart.next_field().await.map_err(broken_multipart)? {
        match field.name().unwrap_or_default() {
            "cover_letter" => cover_letter = Some(text_field(field).await?),
            "resume" => resume = Some(file_field(field).await?),
            _ => {}
        }
    }

    let patch = ApplicationPatch {
        cover_letter,
        ..Default::default()
    };

    let application = state
        .services
        .applications()
        .update_own(&current, id, patch, resume)
        .await?;

    Ok(Json(application))
}

/// Reviewer transition
#[utoipa::path(
    post,
    path = "/applications/{id}/status",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Application ID")),
    request_body = ApplicationStatusRequest,
    responses(
        (status = 200, description = "Application after the transition", body = JobApplication),
        (status = 403, description = "Reviewer only"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn transition_application(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplicationStatusRequest>,
) -> AppResult<Json<JobApplication>> {
    let application = state
        .services
        .applications()
        .transition(&current, id, payload.status)
        .await?;

    Ok(Json(application))
}

/// Withdraw (applicant) or delete (reviewer). Both remove the resume.
#[utoipa::path(
    delete,
    path = "/applications/{id}",
    tag = "Applications",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Application ID")),
    responses(
        (status = 200, description = "Application removed"),
        (status = 403, description = "Not the applicant"),
        (status = 404, description = "No such application"),
        (status = 409, description = "Already under review")
    )
)]
pub async fn delete_application(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    // Reviewers delete outright, applicants withdraw within the
    // editable window.
    if current.allows(Permission::ReviewApplications) {
        state.services.applications().delete(&current, id).await?;
    } else {
        state
            .services
            .applications()
            .withdraw_own(&current, id)
            .await?;
    }

    Ok(ApiResponse::message("Application removed"))
}
