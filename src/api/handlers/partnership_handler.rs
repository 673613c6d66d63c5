//! Partnership request handlers. Plain JSON throughout, no uploads.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CurrentUser, Partnership, PartnershipPatch, PartnershipStatus, Permission};
use crate::errors::AppResult;
use crate::services::CreatePartnership;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePartnershipRequest {
    #[validate(length(min = 1, message = "Organization name is required"))]
    #[schema(example = "Selam Relief Network")]
    pub organization_name: String,
    #[validate(length(min = 1, message = "Organization type is required"))]
    #[schema(example = "NGO")]
    pub organization_type: String,
    #[validate(length(min = 1, message = "Proposal is required"))]
    pub proposal: String,
    #[validate(url(message = "Website must be a valid URL"))]
    #[schema(example = "https://selam.example.org")]
    pub website: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePartnershipRequest {
    pub organization_name: Option<String>,
    pub organization_type: Option<String>,
    pub proposal: Option<String>,
    pub website: Option<String>,
}

/// Reviewer transition payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PartnershipStatusRequest {
    pub status: PartnershipStatus,
}

#[derive(Debug, Deserialize)]
pub struct PartnershipListQuery {
    pub status: Option<PartnershipStatus>,
}

pub fn partnership_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_partnership).get(list_partnerships))
        .route(
            "/:id",
            get(get_partnership)
                .put(update_partnership)
                .delete(delete_partnership),
        )
        .route("/:id/status", post(transition_partnership))
}

/// File a partnership request
#[utoipa::path(
    post,
    path = "/partnerships",
    tag = "Partnerships",
    security(("bearer_auth" = [])),
    request_body = CreatePartnershipRequest,
    responses(
        (status = 201, description = "Filed request", body = Partnership),
        (status = 409, description = "An open request already exists")
    )
)]
pub async fn create_partnership(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePartnershipRequest>,
) -> AppResult<Created<Partnership>> {
    let input = CreatePartnership {
        organization_name: payload.organization_name,
        organization_type: payload.organization_type,
        proposal: payload.proposal,
        website: payload.website,
    };

    let partnership = state
        .services
        .partnerships()
        .create(&current, input)
        .await?;

    Ok(Created(partnership))
}

/// List requests: all for reviewers, own for everyone else
#[utoipa::path(
    get,
    path = "/partnerships",
    tag = "Partnerships",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<PartnershipStatus>, Query, description = "Filter by status"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Paginated requests"))
)]
pub async fn list_partnerships(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<PartnershipListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Partnership>>> {
    let page = state
        .services
        .partnerships()
        .list(&current, query.status, pagination)
        .await?;

    Ok(Json(page))
}

/// Fetch one request
#[utoipa::path(
    get,
    path = "/partnerships/{id}",
    tag = "Partnerships",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Partnership request ID")),
    responses(
        (status = 200, description = "The request", body = Partnership),
        (status = 404, description = "Not found or not the caller's")
    )
)]
pub async fn get_partnership(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Partnership>> {
    let partnership = state.services.partnerships().get(&current, id).await?;

    Ok(Json(partnership))
}

/// Owner edit while the request is still pending
#[utoipa::path(
    put,
    path = "/partnerships/{id}",
    tag = "Partnerships",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Partnership request ID")),
    request_body = UpdatePartnershipRequest,
    responses(
        (status = 200, description = "Updated request", body = Partnership),
        (status = 403, description = "Not the requester"),
        (status = 409, description = "Already under review")
    )
)]
pub async fn update_partnership(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePartnershipRequest>,
) -> AppResult<Json<Partnership>> {
    let patch = PartnershipPatch {
        organization_name: payload.organization_name,
        organization_type: payload.organization_type,
        proposal: payload.proposal,
        website: payload.website,
    };

    let partnership = state
        .services
        .partnerships()
        .update_own(&current, id, patch)
        .await?;

    Ok(Json(partnership))
}

/// Reviewer transition
#[utoipa::path(
    post,
    path = "/partnerships/{id}/status",
    tag = "Partnerships",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Partnership request ID")),
    request_body = PartnershipStatusRequest,
    responses(
        (status = 200, description = "Request after the transition", body = Partnership),
        (status = 403, description = "Reviewer only"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn transition_partnership(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartnershipStatusRequest>,
) -> AppResult<Json<Partnership>> {
    let partnership = state
        .services
        .partnerships()
        .transition(&current, id, payload.status)
        .await?;

    Ok(Json(partnership))
}

/// Withdraw (owner) or delete (reviewer)
#[utoipa::path(
    delete,
    path = "/partnerships/{id}",
    tag = "Partnerships",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Partnership request ID")),
    responses(
        (status = 200, description = "Request removed"),
        (status = 403, description = "Not the requester"),
        (status = 404, description = "No such request"),
        (status = 409, description = "Already under review")
    )
)]
pub async fn delete_partnership(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    if current.allows(Permission::ReviewPartnerships) {
        state.services.partnerships().delete(&current, id).await?;
    } else {
        state
            .services
            .partnerships()
            .withdraw_own(&current, id)
            .await?;
    }

    Ok(ApiResponse::message("Request removed"))
}
