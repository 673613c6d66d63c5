//! Geography reference data handlers.
//!
//! Listing is public so registration and order forms can populate
//! their dropdowns without a token. Mutations are admin only and sit
//! behind the auth middleware.

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
use crate::domain::{CurrentUser, Region, Woreda, Zone};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created};

/// Name payload shared by region create and all three rename endpoints.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NameRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[schema(example = "Oromia")]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateZoneRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[schema(example = "East Shewa")]
    pub name: String,
    pub region_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWoredaRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    #[schema(example = "Adama")]
    pub name: String,
    pub zone_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ZoneListQuery {
    pub region_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct WoredaListQuery {
    pub zone_id: Option<Uuid>,
}

/// Token-free listing routes.
pub fn public_geography_routes() -> Router<AppState> {
    Router::new()
        .route("/regions", get(list_regions))
        .route("/zones", get(list_zones))
        .route("/woredas", get(list_woredas))
}

/// Admin mutation routes, nested behind the auth middleware.
pub fn geography_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/regions", post(create_region))
        .route("/regions/:id", put(rename_region).delete(delete_region))
        .route("/zones", post(create_zone))
        .route("/zones/:id", put(rename_zone).delete(delete_zone))
        .route("/woredas", post(create_woreda))
        .route("/woredas/:id", put(rename_woreda).delete(delete_woreda))
}

/// All regions
#[utoipa::path(
    get,
    path = "/geography/regions",
    tag = "Geography",
    responses((status = 200, description = "Regions sorted by name", body = Vec<Region>))
)]
pub async fn list_regions(State(state): State<AppState>) -> AppResult<Json<Vec<Region>>> {
    let regions = state.services.geography().list_regions().await?;

    Ok(Json(regions))
}

/// Zones, optionally limited to one region
#[utoipa::path(
    get,
    path = "/geography/zones",
    tag = "Geography",
    params(("region_id" = Option<Uuid>, Query, description = "Limit to one region")),
    responses((status = 200, description = "Zones sorted by name", body = Vec<Zone>))
)]
pub async fn list_zones(
    State(state): State<AppState>,
    Query(query): Query<ZoneListQuery>,
) -> AppResult<Json<Vec<Zone>>> {
    let zones = state
        .services
        .geography()
        .list_zones(query.region_id)
        .await?;

    Ok(Json(zones))
}

/// Woredas, optionally limited to one zone
#[utoipa::path(
    get,
    path = "/geography/woredas",
    tag = "Geography",
    params(("zone_id" = Option<Uuid>, Query, description = "Limit to one zone")),
    responses((status = 200, description = "Woredas sorted by name", body = Vec<Woreda>))
)]
pub async fn list_woredas(
    State(state): State<AppState>,
    Query(query): Query<WoredaListQuery>,
) -> AppResult<Json<Vec<Woreda>>> {
    let woredas = state
        .services
        .geography()
        .list_woredas(query.zone_id)
        .await?;

    Ok(Json(woredas))
}

/// Create a region (admin)
#[utoipa::path(
    post,
    path = "/geography/regions",
    tag = "Geography",
    security(("bearer_auth" = [])),
    request_body = NameRequest,
    responses(
        (status = 201, description = "Created region", body = Region),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Name already exists")
    )
)]
pub async fn create_region(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<NameRequest>,
) -> AppResult<Created<Region>> {
    let region = state
        .services
        .geography()
        .create_region(&current, payload.name)
        .await?;

    Ok(Created(region))
}

/// Rename a region (admin)
#[utoipa::path(
    put,
    path = "/geography/regions/{id}",
    tag = "Geography",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Region ID")),
    request_body = NameRequest,
    responses(
        (status = 200, description = "Renamed region", body = Region),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such region")
    )
)]
pub async fn rename_region(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NameRequest>,
) -> AppResult<Json<Region>> {
    let region = state
        .services
        .geography()
        .rename_region(&current, id, payload.name)
        .await?;

    Ok(Json(region))
}

/// Delete a region (admin). Fails while zones still reference it.
#[utoipa::path(
    delete,
    path = "/geography/regions/{id}",
    tag = "Geography",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Region ID")),
    responses(
        (status = 200, description = "Region deleted"),
        (status = 400, description = "Zones still reference this region"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such region")
    )
)]
pub async fn delete_region(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.geography().delete_region(&current, id).await?;

    Ok(ApiResponse::message("Region deleted"))
}

/// Create a zone under a region (admin)
#[utoipa::path(
    post,
    path = "/geography/zones",
    tag = "Geography",
    security(("bearer_auth" = [])),
    request_body = CreateZoneRequest,
    responses(
        (status = 201, description = "Created zone", body = Zone),
        (status = 400, description = "Region does not exist"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_zone(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateZoneRequest>,
) -> AppResult<Created<Zone>> {
    let zone = state
        .services
        .geography()
        .create_zone(&current, payload.name, payload.region_id)
        .await?;

    Ok(Created(zone))
}

/// Rename a zone (admin)
#[utoipa::path(
    put,
    path = "/geography/zones/{id}",
    tag = "Geography",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Zone ID")),
    request_body = NameRequest,
    responses(
        (status = 200, description = "Renamed zone", body = Zone),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such zone")
    )
)]
pub async fn rename_zone(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NameRequest>,
) -> AppResult<Json<Zone>> {
    let zone = state
        .services
        .geography()
        .rename_zone(&current, id, payload.name)
        .await?;

    Ok(Json(zone))
}

/// Delete a zone (admin). Fails while woredas still reference it.
#[utoipa::path(
    delete,
    path = "/geography/zones/{id}",
    tag = "Geography",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Zone ID")),
    responses(
        (status = 200, description = "Zone deleted"),
        (status = 400, description = "Woredas still reference this zone"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such zone")
    )
)]
pub async fn delete_zone(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.geography().delete_zone(&current, id).await?;

    Ok(ApiResponse::message("Zone deleted"))
}

/// Create a woreda under a zone (admin)
#[utoipa::path(
    post,
    path = "/geography/woredas",
    tag = "Geography",
    security(("bearer_auth" = [])),
    request_body = CreateWoredaRequest,
    responses(
        (status = 201, description = "Created woreda", body = Woreda),
        (status = 400, description = "Zone does not exist"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_woreda(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateWoredaRequest>,
) -> AppResult<Created<Woreda>> {
    let woreda = state
        .services
        .geography()
        .create_woreda(&current, payload.name, payload.zone_id)
        .await?;

    Ok(Created(woreda))
}

/// Rename a woreda (admin)
#[utoipa::path(
    put,
    path = "/geography/woredas/{id}",
    tag = "Geography",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Woreda ID")),
    request_body = NameRequest,
    responses(
        (status = 200, description = "Renamed woreda", body = Woreda),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such woreda")
    )
)]
pub async fn rename_woreda(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NameRequest>,
) -> AppResult<Json<Woreda>> {
    let woreda = state
        .services
        .geography()
        .rename_woreda(&current, id, payload.name)
        .await?;

    Ok(Json(woreda))
}

/// Delete a woreda (admin)
#[utoipa::path(
    delete,
    path = "/geography/woredas/{id}",
    tag = "Geography",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Woreda ID")),
    responses(
        (status = 200, description = "Woreda deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such woreda")
    )
)]
pub async fn delete_woreda(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.geography().delete_woreda(&current, id).await?;

    Ok(ApiResponse::message("Woreda deleted"))
}
