//! Rate limiting middleware backed by the cache.
//!
//! Two windows: a general one for the whole API and a stricter one in
//! front of the credential endpoints. When the cache cannot be reached
//! the request is denied, not waved through.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::api::AppState;
use crate::config::{
    RATE_LIMIT_AUTH_REQUESTS, RATE_LIMIT_AUTH_WINDOW_SECONDS, RATE_LIMIT_REQUESTS,
    RATE_LIMIT_WINDOW_SECONDS,
};

/// 429 response carrying the retry hint.
#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after: u64,
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Retry-After",
            HeaderValue::from_str(&self.retry_after.to_string()).unwrap(),
        );
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("0"));

        (
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            "Too many requests. Please try again later.",
        )
            .into_response()
    }
}

/// Client key for rate limiting: first proxy-forwarded address, then
/// the socket peer, then a shared bucket.
fn client_identifier(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next() {
            return ip.trim().to_string();
        }
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
    {
        return real_ip.to_string();
    }

    if let Some(connect_info) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return connect_info.0.ip().to_string();
    }

    "unknown".to_string()
}

/// Count this request against a window and fail when over the limit or
/// when the counter store is unreachable.
async fn enforce(
    state: &AppState,
    key: String,
    max_requests: u64,
    window_seconds: u64,
) -> Result<u64, RateLimitError> {
    let (count, allowed) = state
        .cache
        .check_rate_limit(&key, max_requests, window_seconds)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Rate limit check failed, denying request");
            RateLimitError {
                retry_after: window_seconds,
            }
        })?;

    if !allowed {
        tracing::warn!(key = %key, count, "Rate limit exceeded");
        return Err(RateLimitError {
            retry_after: window_seconds,
        });
    }

    Ok(count)
}

fn stamp_headers(response: &mut Response, limit: u64, count: u64) {
    let remaining = limit.saturating_sub(count);
    response.headers_mut().insert(
        "X-RateLimit-Limit",
        HeaderValue::from_str(&limit.to_string()).unwrap(),
    );
    response.headers_mut().insert(
        "X-RateLimit-Remaining",
        HeaderValue::from_str(&remaining.to_string()).unwrap(),
    );
}

/// General API window.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let key = format!("general:{}", client_identifier(&request));
    let count = enforce(&state, key, RATE_LIMIT_REQUESTS, RATE_LIMIT_WINDOW_SECONDS).await?;

    let mut response = next.run(request).await;
    stamp_headers(&mut response, RATE_LIMIT_REQUESTS, count);

    Ok(response)
}

/// Stricter window in front of the credential endpoints.
pub async fn rate_limit_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let key = format!("auth:{}", client_identifier(&request));
    let count = enforce(
        &state,
        key,
        RATE_LIMIT_AUTH_REQUESTS,
        RATE_LIMIT_AUTH_WINDOW_SECONDS,
    )
    .await?;

    let mut response = next.run(request).await;
    stamp_headers(&mut response, RATE_LIMIT_AUTH_REQUESTS, count);

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_requests_response_carries_retry_hint() {
        let error = RateLimitError { retry_after: 60 };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get("Retry-After").unwrap(),
            &HeaderValue::from_static("60")
        );
    }
}
