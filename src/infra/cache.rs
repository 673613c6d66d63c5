//! Redis-backed transient store.
//!
//! Holds short-lived state that never touches Postgres: OTP codes,
//! pending registrations awaiting verification, and rate-limit counters.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::{
    Config, CACHE_PREFIX_RATE_LIMIT, KEY_PREFIX_OTP, KEY_PREFIX_OTP_ATTEMPTS,
    KEY_PREFIX_PENDING_USER, OTP_TTL_SECONDS, PENDING_USER_TTL_SECONDS,
};
use crate::domain::PendingRegistration;
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
}

impl Cache {
    /// Create a new cache instance and connect to Redis.
    ///
    /// # Panics
    /// Panics if Redis connection fails.
    pub async fn connect(config: &Config) -> Self {
        let client =
            Client::open(config.redis_url.as_str()).expect("Failed to create Redis client");

        let connection = ConnectionManager::new(client)
            .await
            .expect("Failed to connect to Redis");

        tracing::info!("Redis cache connected");

        Self { connection }
    }

    // =========================================================================
    // Generic Cache Operations
    // =========================================================================

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with a TTL (in seconds).
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await
            .map_err(cache_error)?;

        Ok(())
    }

    /// Delete a value from cache.
    pub async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(key).await.map_err(cache_error)?;
        Ok(())
    }

    /// Check if a key exists in cache.
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.exists(key).await.map_err(cache_error)?;
        Ok(exists)
    }

    /// Increment a counter value.
    pub async fn incr(&self, key: &str) -> AppResult<i64> {
        let mut conn = self.connection.clone();
        let value: i64 = conn.incr(key, 1).await.map_err(cache_error)?;
        Ok(value)
    }

    // =========================================================================
    // Rate Limiting Operations
    // =========================================================================

    /// Check and increment rate limit counter.
    /// Returns (current_count, is_allowed) tuple.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        // Check if key exists
        let exists: bool = conn.exists(&key).await.map_err(cache_error)?;

        if !exists {
            // First request in window
            let _: () = conn
                .set_ex(&key, 1i64, window_seconds)
                .await
                .map_err(cache_error)?;
            return Ok((1, true));
        }

        // Increment counter
        let count: i64 = conn.incr(&key, 1).await.map_err(cache_error)?;
        let count = count as u64;
        let allowed = count <= max_requests;

        Ok((count, allowed))
    }
}

/// Short-lived registration state keyed by email.
///
/// Everything behind this trait lives only in Redis: the OTP code, the
/// pending registration payload, and the failed-attempt counter.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransientStore: Send + Sync {
    /// Stage a registration: store the OTP code and the pending payload,
    /// and reset the attempt counter from any earlier registration round.
    async fn stage_registration(
        &self,
        email: &str,
        code: &str,
        pending: &PendingRegistration,
    ) -> AppResult<()>;

    /// Fetch the OTP code staged for an email, if it has not expired.
    async fn fetch_otp(&self, email: &str) -> AppResult<Option<String>>;

    /// Replace the OTP code for an already staged registration (resend).
    async fn refresh_otp(&self, email: &str, code: &str) -> AppResult<()>;

    /// Fetch the pending registration payload staged for an email.
    async fn fetch_pending_registration(&self, email: &str)
        -> AppResult<Option<PendingRegistration>>;

    /// Count a failed verification attempt and return the running total.
    async fn record_otp_attempt(&self, email: &str) -> AppResult<i64>;

    /// Invalidate the staged OTP code, leaving the pending payload intact.
    async fn invalidate_otp(&self, email: &str) -> AppResult<()>;

    /// Drop every key staged for a registration (after account creation).
    async fn clear_registration(&self, email: &str) -> AppResult<()>;
}

#[async_trait]
impl TransientStore for Cache {
    /// The code expires before the payload does; a lapsed code leaves a
    /// registration that can still be resent.
    async fn stage_registration(
        &self,
        email: &str,
        code: &str,
        pending: &PendingRegistration,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();

        conn.set_ex::<_, _, ()>(otp_key(email), code, OTP_TTL_SECONDS)
            .await
            .map_err(cache_error)?;

        self.set_with_ttl(&pending_key(email), pending, PENDING_USER_TTL_SECONDS)
            .await?;

        self.delete(&attempts_key(email)).await?;

        Ok(())
    }

    async fn fetch_otp(&self, email: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection.clone();
        let code: Option<String> = conn.get(otp_key(email)).await.map_err(cache_error)?;
        Ok(code)
    }

    async fn refresh_otp(&self, email: &str, code: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        conn.set_ex::<_, _, ()>(otp_key(email), code, OTP_TTL_SECONDS)
            .await
            .map_err(cache_error)?;
        self.delete(&attempts_key(email)).await?;
        Ok(())
    }

    async fn fetch_pending_registration(
        &self,
        email: &str,
    ) -> AppResult<Option<PendingRegistration>> {
        self.get(&pending_key(email)).await
    }

    /// The counter shares the OTP code's lifetime.
    async fn record_otp_attempt(&self, email: &str) -> AppResult<i64> {
        let key = attempts_key(email);
        let count = self.incr(&key).await?;
        if count == 1 {
            let mut conn = self.connection.clone();
            let _: () = conn
                .expire(&key, OTP_TTL_SECONDS as i64)
                .await
                .map_err(cache_error)?;
        }
        Ok(count)
    }

    async fn invalidate_otp(&self, email: &str) -> AppResult<()> {
        self.delete(&otp_key(email)).await?;
        self.delete(&attempts_key(email)).await
    }

    async fn clear_registration(&self, email: &str) -> AppResult<()> {
        self.delete(&otp_key(email)).await?;
        self.delete(&pending_key(email)).await?;
        self.delete(&attempts_key(email)).await
    }
}

fn otp_key(email: &str) -> String {
    format!("{}{}", KEY_PREFIX_OTP, email)
}

fn pending_key(email: &str) -> String {
    format!("{}{}", KEY_PREFIX_PENDING_USER, email)
}

fn attempts_key(email: &str) -> String {
    format!("{}{}", KEY_PREFIX_OTP_ATTEMPTS, email)
}

/// Convert Redis error to AppError.
fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_keys_embed_email() {
        assert_eq!(otp_key("a@b.et"), "otp:a@b.et");
        assert_eq!(pending_key("a@b.et"), "pending_user:a@b.et");
        assert_eq!(attempts_key("a@b.et"), "otp_attempts:a@b.et");
    }

    #[test]
    fn test_payload_outlives_code() {
        assert!(PENDING_USER_TTL_SECONDS > OTP_TTL_SECONDS);
    }
}
