//! User profile and account administration handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{AccountStatus, CurrentUser, Role, UserResponse};
use crate::errors::AppResult;
use crate::infra::repositories::UserFilter;
use crate::types::{ApiResponse, Paginated, PaginationParams};

/// Profile update, both fields optional.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[schema(example = "Abebe Kebede")]
    pub name: Option<String>,
    #[validate(length(min = 7, message = "Phone number is too short"))]
    #[schema(example = "+251911234567")]
    pub phone: Option<String>,
}

/// Role assignment. The geography binding must match the role: region
/// admins bind a region, zone admins a zone, woreda admins a woreda.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignRoleRequest {
    pub role: Role,
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
}

/// Account listing filters, combined with the shared pagination params.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
    /// Case-insensitive match against name or email
    pub search: Option<String>,
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_profile).put(update_profile))
        .route("/:id", get(get_user).delete(delete_user))
        .route("/:id/role", put(assign_role))
        .route("/:id/block", post(block_user))
        .route("/:id/unblock", post(unblock_user))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn get_profile(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_profile(&current).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Update the current user's name or phone
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 401, description = "Unauthenticated"),
        (status = 409, description = "Phone number already in use")
    )
)]
pub async fn update_profile(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users()
        .update_profile(&current, payload.name, payload.phone)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// List accounts (admin)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("role" = Option<Role>, Query, description = "Filter by role"),
        ("status" = Option<AccountStatus>, Query, description = "Filter by account status"),
        ("search" = Option<String>, Query, description = "Match against name or email"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Paginated accounts"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let filter = UserFilter {
        role: query.role,
        status: query.status,
        search: query.search,
    };

    let page = state
        .services
        .users()
        .list_users(&current, filter, pagination)
        .await?;

    Ok(Json(page.map(UserResponse::from)))
}

/// Fetch one account (admin)
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "The account", body = UserResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().get_user(&current, id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Assign a role and geography binding (admin)
#[utoipa::path(
    put,
    path = "/users/{id}/role",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AssignRoleRequest,
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Binding does not match the role"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such user")
    )
)]
pub async fn assign_role(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRoleRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users()
        .assign_role(
            &current,
            id,
            payload.role,
            payload.region_id,
            payload.zone_id,
            payload.woreda_id,
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Block an account (admin)
#[utoipa::path(
    post,
    path = "/users/{id}/block",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Blocked account", body = UserResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such user")
    )
)]
pub async fn block_user(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().block_user(&current, id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Unblock an account (admin)
#[utoipa::path(
    post,
    path = "/users/{id}/unblock",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Active account", body = UserResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such user")
    )
)]
pub async fn unblock_user(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users().unblock_user(&current, id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Ban an account (admin). Irreversible through the API.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account banned"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.users().delete_user(&current, id).await?;

    Ok(ApiResponse::message("Account banned"))
}
