//! Dashboard statistics handler.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::AppState;
use crate::domain::CurrentUser;
use crate::errors::AppResult;
use crate::services::StatsOverview;

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/", get(overview))
}

/// Dashboard overview: per-family totals, status breakdowns and
/// today/weekly/monthly buckets, scoped to the caller's area.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "Statistics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = StatsOverview),
        (status = 403, description = "Staff only")
    )
)]
pub async fn overview(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<StatsOverview>> {
    let overview = state.services.stats().overview(&current).await?;

    Ok(Json(overview))
}
