//! News handlers.
//!
//! The public feed hides expired items; single-item reads keep working
//! after expiry so shared links do not break. Publishing is admin only
//! and arrives as multipart because of the cover image.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::extractors::{
    broken_multipart, file_field, parse_datetime, required, text_field,
};
use crate::api::AppState;
use crate::domain::{CurrentUser, News, NewsPatch, Upload};
use crate::errors::AppResult;
use crate::services::CreateNews;
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Token-free feed routes.
pub fn public_news_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_news))
        .route("/:id", get(get_news))
}

/// Publishing routes, nested behind the auth middleware.
pub fn news_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_news))
        .route("/all", get(list_all_news))
        .route("/:id", put(update_news).delete(delete_news))
}

/// Accumulates multipart parts for create and update.
#[derive(Default)]
struct NewsForm {
    title: Option<String>,
    body: Option<String>,
    expires_at: Option<String>,
    image: Option<Upload>,
}

impl NewsForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(broken_multipart)? {
            match field.name().unwrap_or_default() {
                "title" => form.title = Some(text_field(field).await?),
                "body" => form.body = Some(text_field(field).await?),
                "expires_at" => form.expires_at = Some(text_field(field).await?),
                "image" => form.image = Some(file_field(field).await?),
                _ => {}
            }
        }

        Ok(form)
    }

    fn parsed_expiry(&self) -> AppResult<Option<chrono::DateTime<chrono::Utc>>> {
        self.expires_at
            .as_deref()
            .map(|raw| parse_datetime(raw, "expires_at"))
            .transpose()
    }
}

/// Public feed, unexpired items only
#[utoipa::path(
    get,
    path = "/news",
    tag = "News",
    params(
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Paginated news, newest first"))
)]
pub async fn list_news(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<News>>> {
    let page = state.services.news().list_public(pagination).await?;

    Ok(Json(page))
}

/// Fetch one item, expired included
#[utoipa::path(
    get,
    path = "/news/{id}",
    tag = "News",
    params(("id" = Uuid, Path, description = "News ID")),
    responses(
        (status = 200, description = "The item", body = News),
        (status = 404, description = "No such item")
    )
)]
pub async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<News>> {
    let item = state.services.news().get(id).await?;

    Ok(Json(item))
}

/// Publish an item (admin)
#[utoipa::path(
    post,
    path = "/news",
    tag = "News",
    security(("bearer_auth" = [])),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Published item", body = News),
        (status = 400, description = "Missing field or expiry in the past"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_news(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Created<News>> {
    let form = NewsForm::read(multipart).await?;

    let input = CreateNews {
        title: required(form.title.clone(), "title")?,
        body: required(form.body.clone(), "body")?,
        expires_at: form.parsed_expiry()?,
        image: form.image,
    };

    let item = state.services.news().create(&current, input).await?;

    Ok(Created(item))
}

/// Admin listing, expired included
#[utoipa::path(
    get,
    path = "/news/all",
    tag = "News",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Paginated news, newest first"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_all_news(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<News>>> {
    let page = state.services.news().list_all(&current, pagination).await?;

    Ok(Json(page))
}

/// Edit an item (admin). A new image replaces the stored file.
#[utoipa::path(
    put,
    path = "/news/{id}",
    tag = "News",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "News ID")),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated item", body = News),
        (status = 400, description = "Expiry in the past"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such item")
    )
)]
pub async fn update_news(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<News>> {
    let form = NewsForm::read(multipart).await?;

    let patch = NewsPatch {
        title: form.title.clone(),
        body: form.body.clone(),
        expires_at: form.parsed_expiry()?,
        ..Default::default()
    };

    let item = state
        .services
        .news()
        .update(&current, id, patch, form.image)
        .await?;

    Ok(Json(item))
}

/// Delete an item (admin). The image is removed from storage.
#[utoipa::path(
    delete,
    path = "/news/{id}",
    tag = "News",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "News ID")),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such item")
    )
)]
pub async fn delete_news(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.news().delete(&current, id).await?;

    Ok(ApiResponse::message("News item deleted"))
}
