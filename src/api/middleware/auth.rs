//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::CurrentUser;
use crate::errors::AppError;

/// Validate the bearer token and stash the resolved [`CurrentUser`] in
/// the request extensions for handlers to pick up.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthenticated)?;

    let claims = state.services.auth().verify_token(token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
        region_id: claims.region_id,
        zone_id: claims.zone_id,
        woreda_id: claims.woreda_id,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}
