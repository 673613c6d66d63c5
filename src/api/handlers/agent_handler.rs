//! Agent enrollment request handlers.

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
use crate::domain::{AgentRequest, AgentRequestPatch, AgentStatus, CurrentUser};
use crate::errors::AppResult;
use crate::services::CreateAgentRequest;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAgentRequestBody {
    pub region_id: Uuid,
    pub zone_id: Uuid,
    pub woreda_id: Uuid,
    #[validate(length(min = 1, message = "Motivation is required"))]
    pub motivation: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAgentRequestBody {
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
    pub motivation: Option<String>,
}

/// Reviewer decision payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AgentStatusRequest {
    pub status: AgentStatus,
}

#[derive(Debug, Deserialize)]
pub struct AgentListQuery {
    pub status: Option<AgentStatus>,
}

pub fn agent_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_agent_request).get(list_agent_requests))
        .route(
            "/:id",
            get(get_agent_request)
                .put(update_agent_request)
                .delete(delete_agent_request),
        )
        .route("/:id/cancel", post(cancel_agent_request))
        .route("/:id/status", post(transition_agent_request))
}

/// Request enrollment as an agent for a woreda
#[utoipa::path(
    post,
    path = "/agent-requests",
    tag = "Agent requests",
    security(("bearer_auth" = [])),
    request_body = CreateAgentRequestBody,
    responses(
        (status = 201, description = "Filed request", body = AgentRequest),
        (status = 400, description = "Broken geography chain"),
        (status = 409, description = "An open request already exists")
    )
)]
pub async fn create_agent_request(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateAgentRequestBody>,
) -> AppResult<Created<AgentRequest>> {
    let input = CreateAgentRequest {
        region_id: payload.region_id,
        zone_id: payload.zone_id,
        woreda_id: payload.woreda_id,
        motivation: payload.motivation,
    };

    let request = state.services.agents().create(&current, input).await?;

    Ok(Created(request))
}

/// List requests: all for reviewers, own for everyone else
#[utoipa::path(
    get,
    path = "/agent-requests",
    tag = "Agent requests",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<AgentStatus>, Query, description = "Filter by status"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Paginated requests"))
)]
pub async fn list_agent_requests(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<AgentListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AgentRequest>>> {
    let page = state
        .services
        .agents()
        .list(&current, query.status, pagination)
        .await?;

    Ok(Json(page))
}

/// Fetch one request
#[utoipa::path(
    get,
    path = "/agent-requests/{id}",
    tag = "Agent requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Agent request ID")),
    responses(
        (status = 200, description = "The request", body = AgentRequest),
        (status = 404, description = "Not found or not the caller's")
    )
)]
pub async fn get_agent_request(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AgentRequest>> {
    let request = state.services.agents().get(&current, id).await?;

    Ok(Json(request))
}

/// Owner edit while the request is still pending. Changing any
/// geography field re-validates the whole chain.
#[utoipa::path(
    put,
    path = "/agent-requests/{id}",
    tag = "Agent requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Agent request ID")),
    request_body = UpdateAgentRequestBody,
    responses(
        (status = 200, description = "Updated request", body = AgentRequest),
        (status = 400, description = "Broken geography chain"),
        (status = 403, description = "Not the requester"),
        (status = 409, description = "Already decided")
    )
)]
pub async fn update_agent_request(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAgentRequestBody>,
) -> AppResult<Json<AgentRequest>> {
    let patch = AgentRequestPatch {
        region_id: payload.region_id,
        zone_id: payload.zone_id,
        woreda_id: payload.woreda_id,
        motivation: payload.motivation,
    };

    let request = state
        .services
        .agents()
        .update_own(&current, id, patch)
        .await?;

    Ok(Json(request))
}

/// Owner cancel while the request is still pending
#[utoipa::path(
    post,
    path = "/agent-requests/{id}/cancel",
    tag = "Agent requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Agent request ID")),
    responses(
        (status = 200, description = "Cancelled request", body = AgentRequest),
        (status = 403, description = "Not the requester"),
        (status = 409, description = "Already decided")
    )
)]
pub async fn cancel_agent_request(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AgentRequest>> {
    let request = state.services.agents().cancel_own(&current, id).await?;

    Ok(Json(request))
}

/// Reviewer decision. Approval promotes the account to the agent role.
#[utoipa::path(
    post,
    path = "/agent-requests/{id}/status",
    tag = "Agent requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Agent request ID")),
    request_body = AgentStatusRequest,
    responses(
        (status = 200, description = "Request after the decision", body = AgentRequest),
        (status = 403, description = "Reviewer only"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn transition_agent_request(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AgentStatusRequest>,
) -> AppResult<Json<AgentRequest>> {
    let request = state
        .services
        .agents()
        .transition(&current, id, payload.status)
        .await?;

    Ok(Json(request))
}

/// Reviewer delete
#[utoipa::path(
    delete,
    path = "/agent-requests/{id}",
    tag = "Agent requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Agent request ID")),
    responses(
        (status = 200, description = "Request deleted"),
        (status = 403, description = "Reviewer only"),
        (status = 404, description = "No such request")
    )
)]
pub async fn delete_agent_request(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.agents().delete(&current, id).await?;

    Ok(ApiResponse::message("Request deleted"))
}
