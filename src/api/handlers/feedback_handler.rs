//! Feedback handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{delete, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{CurrentUser, Feedback, FeedbackKind};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFeedbackRequest {
    /// Contact address; defaults to the account email on the client
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "abebe@example.et")]
    pub email: String,
    pub kind: FeedbackKind,
    #[validate(length(min = 1, message = "Message must not be empty"))]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackListQuery {
    pub kind: Option<FeedbackKind>,
}

pub fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_feedback).get(list_feedback))
        .route("/:id", delete(delete_feedback))
}

/// Leave feedback
#[utoipa::path(
    post,
    path = "/feedback",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Recorded feedback", body = Feedback),
        (status = 409, description = "Identical feedback already submitted")
    )
)]
pub async fn create_feedback(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateFeedbackRequest>,
) -> AppResult<Created<Feedback>> {
    let feedback = state
        .services
        .feedback()
        .create(&current, payload.email, payload.kind, payload.message)
        .await?;

    Ok(Created(feedback))
}

/// List feedback (admin)
#[utoipa::path(
    get,
    path = "/feedback",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    params(
        ("kind" = Option<FeedbackKind>, Query, description = "Filter by kind"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Paginated feedback"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_feedback(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<FeedbackListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Feedback>>> {
    let page = state
        .services
        .feedback()
        .list(&current, query.kind, pagination)
        .await?;

    Ok(Json(page))
}

/// Delete one feedback entry (admin)
#[utoipa::path(
    delete,
    path = "/feedback/{id}",
    tag = "Feedback",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such feedback")
    )
)]
pub async fn delete_feedback(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.feedback().delete(&current, id).await?;

    Ok(ApiResponse::message("Feedback deleted"))
}
