//! Application route configuration.
//!
//! Three rings: token-free routes (health, docs, public browsing),
//! the auth endpoints under their stricter rate limit, and everything
//! else behind the JWT middleware. Browsing and intake for the same
//! resource share a prefix, so the public and protected routers are
//! merged per resource before nesting.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::MAX_UPLOAD_BYTES;

use super::handlers::{
    agent_routes, application_routes, auth_routes, feedback_routes, geography_admin_routes,
    job_routes, message_routes, news_admin_routes, order_routes, partnership_routes,
    public_geography_routes, public_job_routes, public_news_routes, report_routes, stats_routes,
    user_routes,
};
use super::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // Auth check on the inside, rate limit on the outside. Merged
    // public/protected resources guard only their protected half and
    // throttle the whole prefix once.
    let guard = |router: Router<AppState>| {
        router.route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
    };
    let throttle = |router: Router<AppState>| {
        router.route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
    };
    let protect = |router: Router<AppState>| throttle(guard(router));

    Router::new()
        // Health endpoints, no rate limiting
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes, stricter rate limiting
        .nest(
            "/auth",
            auth_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        .nest("/users", protect(user_routes()))
        .nest(
            "/geography",
            throttle(public_geography_routes().merge(guard(geography_admin_routes()))),
        )
        .nest(
            "/reports",
            protect(report_routes()).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest(
            "/orders",
            protect(order_routes()).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest(
            "/jobs",
            throttle(public_job_routes().merge(guard(job_routes())))
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest(
            "/applications",
            protect(application_routes()).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest("/partnerships", protect(partnership_routes()))
        .nest("/agent-requests", protect(agent_routes()))
        .nest("/feedback", protect(feedback_routes()))
        .nest("/messages", protect(message_routes()))
        .nest(
            "/news",
            throttle(public_news_routes().merge(guard(news_admin_routes())))
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .nest("/stats", protect(stats_routes()))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Hulegeb administrative API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = match state.database.ping().await {
        Ok(_) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => ServiceStatus {
            status: "unhealthy",
            error: Some(e.to_string()),
        },
    };

    let redis_status = match state.cache.exists("health:ping").await {
        Ok(_) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => ServiceStatus {
            status: "unhealthy",
            error: Some(e.to_string()),
        },
    };

    let all_healthy = db_status.status == "healthy" && redis_status.status == "healthy";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            database: db_status,
            redis: redis_status,
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
