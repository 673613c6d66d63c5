//! Citizen report handlers.
//!
//! Create and update arrive as `multipart/form-data` because reports
//! may carry photo and video evidence.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{broken_multipart, file_field, parse_uuid, required, text_field};
use crate::api::AppState;
use crate::domain::{CurrentUser, Report, ReportPatch, ReportStatus, Upload};
use crate::errors::AppResult;
use crate::infra::repositories::ReportFilter;
use crate::services::CreateReport;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Staff transition payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportStatusRequest {
    pub status: ReportStatus,
}

#[derive(Debug, Deserialize)]
pub struct ReportListQuery {
    pub status: Option<ReportStatus>,
    pub woreda_id: Option<Uuid>,
}

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_report).get(list_reports))
        .route(
            "/:id",
            get(get_report).put(update_report).delete(delete_report),
        )
        .route("/:id/cancel", post(cancel_report))
        .route("/:id/status", post(transition_report))
}

/// Accumulates multipart parts for create and update.
#[derive(Default)]
struct ReportForm {
    title: Option<String>,
    description: Option<String>,
    region_id: Option<String>,
    zone_id: Option<String>,
    woreda_id: Option<String>,
    image: Option<Upload>,
    video: Option<Upload>,
}

impl ReportForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(broken_multipart)? {
            match field.name().unwrap_or_default() {
                "title" => form.title = Some(text_field(field).await?),
                "description" => form.description = Some(text_field(field).await?),
                "region_id" => form.region_id = Some(text_field(field).await?),
                "zone_id" => form.zone_id = Some(text_field(field).await?),
                "woreda_id" => form.woreda_id = Some(text_field(field).await?),
                "image" => form.image = Some(file_field(field).await?),
                "video" => form.video = Some(file_field(field).await?),
                _ => {}
            }
        }

        Ok(form)
    }
}

/// File a report
#[utoipa::path(
    post,
    path = "/reports",
    tag = "Reports",
    security(("bearer_auth" = [])),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Filed report", body = Report),
        (status = 400, description = "Missing field or broken geography chain"),
        (status = 409, description = "Duplicate report")
    )
)]
pub async fn create_report(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Created<Report>> {
    let form = ReportForm::read(multipart).await?;

    let input = CreateReport {
        title: required(form.title, "title")?,
        description: required(form.description, "description")?,
        region_id: parse_uuid(&required(form.region_id, "region_id")?, "region_id")?,
        zone_id: parse_uuid(&required(form.zone_id, "zone_id")?, "zone_id")?,
        woreda_id: parse_uuid(&required(form.woreda_id, "woreda_id")?, "woreda_id")?,
        image: form.image,
        video: form.video,
    };

    let report = state.services.reports().create(&current, input).await?;

    Ok(Created(report))
}

/// List reports in the caller's scope
#[utoipa::path(
    get,
    path = "/reports",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<ReportStatus>, Query, description = "Filter by status"),
        ("woreda_id" = Option<Uuid>, Query, description = "Filter by woreda"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Paginated reports"))
)]
pub async fn list_reports(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ReportListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Report>>> {
    let filter = ReportFilter {
        status: query.status,
        woreda_id: query.woreda_id,
    };

    let page = state
        .services
        .reports()
        .list(&current, filter, pagination)
        .await?;

    Ok(Json(page))
}

/// Fetch one report
#[utoipa::path(
    get,
    path = "/reports/{id}",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "The report", body = Report),
        (status = 404, description = "Not found or outside the caller's scope")
    )
)]
pub async fn get_report(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Report>> {
    let report = state.services.reports().get(&current, id).await?;

    Ok(Json(report))
}

/// Edit an own pending report
#[utoipa::path(
    put,
    path = "/reports/{id}",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated report", body = Report),
        (status = 403, description = "Not the reporter"),
        (status = 409, description = "No longer editable")
    )
)]
pub async fn update_report(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<Report>> {
    let form = ReportForm::read(multipart).await?;

    let patch = ReportPatch {
        title: form.title,
        description: form.description,
        ..Default::default()
    };

    let report = state
        .services
        .reports()
        .update_own(&current, id, patch, form.image, form.video)
        .await?;

    Ok(Json(report))
}

/// Cancel an own pending report
#[utoipa::path(
    post,
    path = "/reports/{id}/cancel",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Cancelled report", body = Report),
        (status = 403, description = "Not the reporter"),
        (status = 409, description = "No longer cancellable")
    )
)]
pub async fn cancel_report(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Report>> {
    let report = state.services.reports().cancel_own(&current, id).await?;

    Ok(Json(report))
}

/// Staff status transition
#[utoipa::path(
    post,
    path = "/reports/{id}/status",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Report ID")),
    request_body = ReportStatusRequest,
    responses(
        (status = 200, description = "Report after the transition", body = Report),
        (status = 403, description = "Outside the caller's administrative area"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn transition_report(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReportStatusRequest>,
) -> AppResult<Json<Report>> {
    let report = state
        .services
        .reports()
        .transition(&current, id, payload.status)
        .await?;

    Ok(Json(report))
}

/// Staff soft delete. Evidence files are retained.
#[utoipa::path(
    delete,
    path = "/reports/{id}",
    tag = "Reports",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 403, description = "Outside the caller's administrative area"),
        (status = 404, description = "No such report")
    )
)]
pub async fn delete_report(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.reports().delete(&current, id).await?;

    Ok(ApiResponse::message("Report deleted"))
}
