//! Authentication handlers: OTP registration and the token endpoints.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::TokenResponse;
use crate::types::ApiResponse;

/// Registration request. Creates no account until the emailed code is
/// verified.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Abebe Kebede")]
    pub name: String,
    /// Email address, receives the verification code
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "abebe@example.et")]
    pub email: String,
    /// Password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Phone number
    #[validate(length(min = 7, message = "Phone number is required"))]
    #[schema(example = "+251911234567")]
    pub phone: String,
}

/// OTP confirmation request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "abebe@example.et")]
    pub email: String,
    /// The 6-digit emailed code
    #[validate(length(equal = 6, message = "Code must be 6 digits"))]
    #[schema(example = "493817")]
    pub code: String,
}

/// Request to resend the verification code.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResendOtpRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "abebe@example.et")]
    pub email: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "abebe@example.et")]
    pub email: String,
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Refresh token exchange and logout request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: Uuid,
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
}

/// Start a registration
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Verification code sent"),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Email belongs to a banned account"),
        (status = 409, description = "Email or phone already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .services
        .auth()
        .register(payload.name, payload.email, payload.password, payload.phone)
        .await?;

    Ok(ApiResponse::message(
        "Verification code sent. Check your email.",
    ))
}

/// Confirm the emailed code and create the account
#[utoipa::path(
    post,
    path = "/auth/verify-otp",
    tag = "Authentication",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Account created", body = UserResponse),
        (status = 400, description = "Wrong, expired or exhausted code")
    )
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyOtpRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .auth()
        .verify_otp(&payload.email, &payload.code)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Email a fresh verification code
#[utoipa::path(
    post,
    path = "/auth/resend-otp",
    tag = "Authentication",
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "Verification code sent"),
        (status = 400, description = "Registration expired")
    )
)]
pub async fn resend_otp(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResendOtpRequest>,
) -> AppResult<ApiResponse<()>> {
    state.services.auth().resend_otp(&payload.email).await?;

    Ok(ApiResponse::message(
        "Verification code sent. Check your email.",
    ))
}

/// Login and receive tokens
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account blocked or banned")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state
        .services
        .auth()
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(tokens))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = TokenResponse),
        (status = 401, description = "Unknown or expired refresh token")
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> AppResult<Json<TokenResponse>> {
    let tokens = state.services.auth().refresh(payload.refresh_token).await?;

    Ok(Json(tokens))
}

/// Revoke a refresh token
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Refresh token revoked")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> AppResult<ApiResponse<()>> {
    state.services.auth().logout(payload.refresh_token).await?;

    Ok(ApiResponse::message("Logged out"))
}
