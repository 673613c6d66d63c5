//! Support message handlers.
//!
//! Every user owns exactly one thread with the assistant team. Users
//! see only their own thread; assistants see the inbox of all threads
//! and answer into any of them.

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
use crate::domain::{CurrentUser, Message, ThreadSummary};
use crate::errors::AppResult;
use crate::types::{Created, Paginated, PaginationParams};

/// Message body, for both user sends and assistant replies.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, message = "Message must not be empty"))]
    #[schema(example = "My report has been pending for two weeks.")]
    pub body: String,
}

pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(send_message).get(my_thread))
        .route("/threads", get(inbox))
        .route("/threads/:user_id", get(thread).post(reply))
}

/// Write into the caller's own thread
#[utoipa::path(
    post,
    path = "/messages",
    tag = "Messages",
    security(("bearer_auth" = [])),
    request_body = SendMessageRequest,
    responses((status = 201, description = "Sent message", body = Message))
)]
pub async fn send_message(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SendMessageRequest>,
) -> AppResult<Created<Message>> {
    let message = state
        .services
        .messages()
        .send(&current, payload.body)
        .await?;

    Ok(Created(message))
}

/// Read the caller's own thread. Unread assistant replies are marked
/// read once this page is taken.
#[utoipa::path(
    get,
    path = "/messages",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Paginated thread, newest first"))
)]
pub async fn my_thread(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Message>>> {
    let page = state.services.messages().my_thread(&current, pagination).await?;

    Ok(Json(page))
}

/// Assistant inbox over all threads
#[utoipa::path(
    get,
    path = "/messages/threads",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Threads by latest activity"),
        (status = 403, description = "Assistant only")
    )
)]
pub async fn inbox(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ThreadSummary>>> {
    let page = state.services.messages().inbox(&current, pagination).await?;

    Ok(Json(page))
}

/// Assistant reads one user's thread
#[utoipa::path(
    get,
    path = "/messages/threads/{user_id}",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = Uuid, Path, description = "Thread owner"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Paginated thread, newest first"),
        (status = 403, description = "Assistant only")
    )
)]
pub async fn thread(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Message>>> {
    let page = state
        .services
        .messages()
        .thread(&current, user_id, pagination)
        .await?;

    Ok(Json(page))
}

/// Assistant answers into one user's thread
#[utoipa::path(
    post,
    path = "/messages/threads/{user_id}",
    tag = "Messages",
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "Thread owner")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Sent reply", body = Message),
        (status = 403, description = "Assistant only"),
        (status = 404, description = "No such user")
    )
)]
pub async fn reply(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SendMessageRequest>,
) -> AppResult<Created<Message>> {
    let message = state
        .services
        .messages()
        .reply(&current, user_id, payload.body)
        .await?;

    Ok(Created(message))
}
