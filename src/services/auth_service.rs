//! Authentication service: OTP registration, sessions, token issuance.
//!
//! Accounts are created only by [`AuthService::verify_otp`]; until the
//! emailed code is confirmed, the registration exists solely as
//! transient-store keys. Sessions pair a short-lived access JWT with a
//! persisted refresh token that is revoked on logout and on blocking.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, OTP_MAX_ATTEMPTS, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, PendingRegistration, Role, User};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{RefreshTokenRepository, UserRepository};
use crate::infra::TransientStore;
use crate::jobs::Notifier;
use crate::utils::{generate_otp, EmailTemplate};

/// JWT claims payload. Geography ids ride along so scope checks never
/// need a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub woreda_id: Option<Uuid>,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Refresh token; present on login, absent on refresh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<Uuid>,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Access token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication operations.
///
/// Password hashing is handled by the domain [`Password`] value object.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Start a registration: stage it in the transient store and email
    /// an OTP code. No account exists yet.
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        phone: String,
    ) -> AppResult<()>;

    /// Confirm the OTP code and create the permanent account.
    async fn verify_otp(&self, email: &str, code: &str) -> AppResult<User>;

    /// Email a fresh OTP code for a still-pending registration.
    async fn resend_otp(&self, email: &str) -> AppResult<()>;

    /// Login and return access + refresh tokens.
    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse>;

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: Uuid) -> AppResult<TokenResponse>;

    /// Revoke a refresh token. Succeeds whether or not the token still
    /// exists, so repeated logouts are harmless.
    async fn logout(&self, refresh_token: Uuid) -> AppResult<()>;

    /// Verify an access JWT and extract its claims.
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Issue an access JWT for a user. The caller attaches a refresh token
/// where one is due.
fn issue_access_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        region_id: user.region_id,
        zone_id: user.zone_id,
        woreda_id: user.woreda_id,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        refresh_token: None,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Verify JWT token and extract claims (shared helper)
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of [`AuthService`].
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn RefreshTokenRepository>,
    transient: Arc<dyn TransientStore>,
    notifier: Arc<dyn Notifier>,
    config: Config,
}

impl Authenticator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn RefreshTokenRepository>,
        transient: Arc<dyn TransientStore>,
        notifier: Arc<dyn Notifier>,
        config: Config,
    ) -> Self {
        Self {
            users,
            tokens,
            transient,
            notifier,
            config,
        }
    }

    /// Email dispatch is best-effort: failures are logged and never
    /// propagated to the caller.
    async fn send_email(&self, recipient: &str, template: EmailTemplate) {
        if let Err(e) = self.notifier.notify(recipient, template).await {
            tracing::warn!(recipient = %recipient, "Email dispatch failed: {}", e);
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        phone: String,
    ) -> AppResult<()> {
        // A soft-deleted account keeps its email reserved; re-registering
        // it is refused outright rather than reported as taken.
        if let Some(existing) = self.users.find_by_email_any(&email).await? {
            if existing.is_deleted {
                return Err(AppError::forbidden("This account has been banned"));
            }
            return Err(AppError::conflict("Email"));
        }

        if self.users.find_by_phone(&phone).await?.is_some() {
            return Err(AppError::conflict("Phone number"));
        }

        // Hash before staging so the plain text never enters Redis.
        let password_hash = Password::new(&password)?.into_string();
        let pending = PendingRegistration {
            name: name.clone(),
            email: email.clone(),
            password_hash,
            phone,
        };

        let code = generate_otp();
        self.transient
            .stage_registration(&email, &code, &pending)
            .await?;

        self.send_email(&email, EmailTemplate::OtpCode { name, code })
            .await;

        tracing::info!(email = %email, "Registration staged, OTP dispatched");

        Ok(())
    }

    async fn verify_otp(&self, email: &str, code: &str) -> AppResult<User> {
        let staged = self
            .transient
            .fetch_otp(email)
            .await?
            .ok_or_else(|| AppError::expired("OTP code"))?;

        if staged != code {
            let attempts = self.transient.record_otp_attempt(email).await?;
            if attempts >= OTP_MAX_ATTEMPTS {
                // Burn the code; the pending payload survives so a
                // resend can start a fresh round.
                self.transient.invalidate_otp(email).await?;
                tracing::warn!(email = %email, "OTP attempt limit reached");
            }
            return Err(AppError::InvalidOtp);
        }

        // The code is single-use even if account creation fails below.
        self.transient.invalidate_otp(email).await?;

        let pending = self
            .transient
            .fetch_pending_registration(email)
            .await?
            .ok_or_else(|| AppError::expired("Registration"))?;

        // The phone may have been claimed while this registration was
        // pending.
        if self.users.find_by_phone(&pending.phone).await?.is_some() {
            self.transient.clear_registration(email).await?;
            return Err(AppError::conflict("Phone number"));
        }

        let user = self.users.create(pending).await?;
        self.transient.clear_registration(email).await?;

        self.send_email(
            &user.email,
            EmailTemplate::Welcome {
                name: user.name.clone(),
            },
        )
        .await;

        tracing::info!(user_id = %user.id, "Account created after OTP verification");

        Ok(user)
    }

    async fn resend_otp(&self, email: &str) -> AppResult<()> {
        let pending = self
            .transient
            .fetch_pending_registration(email)
            .await?
            .ok_or_else(|| AppError::expired("Registration"))?;

        let code = generate_otp();
        self.transient.refresh_otp(email, &code).await?;

        self.send_email(
            email,
            EmailTemplate::OtpCode {
                name: pending.name,
                code,
            },
        )
        .await;

        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<TokenResponse> {
        let Some(user) = self.users.find_by_email_any(email).await? else {
            // Burn the same hashing work as a real verification so the
            // response time does not reveal whether the email exists.
            Password::verify_dummy(password);
            return Err(AppError::InvalidCredentials);
        };

        if !Password::from_hash(user.password_hash.clone()).verify(password) {
            return Err(AppError::InvalidCredentials);
        }

        // Account state is only disclosed to a caller holding the
        // correct password.
        if user.is_deleted {
            return Err(AppError::forbidden("This account has been banned"));
        }
        if user.is_blocked() {
            return Err(AppError::forbidden("This account is blocked"));
        }

        let refresh_token = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::days(self.config.refresh_token_days);
        self.tokens
            .insert(refresh_token, user.id, expires_at)
            .await?;

        let mut response = issue_access_token(&user, &self.config)?;
        response.refresh_token = Some(refresh_token);

        tracing::info!(user_id = %user.id, "Login succeeded");

        Ok(response)
    }

    async fn refresh(&self, refresh_token: Uuid) -> AppResult<TokenResponse> {
        let record = self
            .tokens
            .find(refresh_token)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if record.expires_at <= Utc::now() {
            self.tokens.delete(refresh_token).await?;
            return Err(AppError::Unauthenticated);
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if user.is_blocked() {
            return Err(AppError::forbidden("This account is blocked"));
        }

        // Refresh tokens are not rotated; only a new access token is
        // issued.
        issue_access_token(&user, &self.config)
    }

    async fn logout(&self, refresh_token: Uuid) -> AppResult<()> {
        let existed = self.tokens.delete(refresh_token).await?;
        if !existed {
            tracing::debug!("Logout for an already revoked token");
        }
        Ok(())
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
