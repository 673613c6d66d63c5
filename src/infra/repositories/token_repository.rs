//! Refresh token repository. One row per issued token; rows disappear
//! on logout, on expiry sweep, or when the owning account is blocked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::refresh_token::{self, ActiveModel, Entity as TokenEntity};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// A stored refresh token row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn insert(
        &self,
        token: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;

    async fn find(&self, token: Uuid) -> AppResult<Option<RefreshTokenRecord>>;

    /// Remove one token. Returns whether a row existed.
    async fn delete(&self, token: Uuid) -> AppResult<bool>;

    /// Remove every token of one user (block, ban, account removal).
    async fn delete_for_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// Remove all tokens past their expiry. Returns the rows removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

pub struct RefreshTokenStore {
    db: DatabaseConnection,
}

impl RefreshTokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenRepository for RefreshTokenStore {
    async fn insert(
        &self,
        token: Uuid,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let active_model = ActiveModel {
            token: Set(token),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now()),
        };

        active_model.insert(&self.db).await?;
        Ok(())
    }

    async fn find(&self, token: Uuid) -> AppResult<Option<RefreshTokenRecord>> {
        let result = TokenEntity::find_by_id(token).one(&self.db).await?;

        Ok(result.map(|model| RefreshTokenRecord {
            token: model.token,
            user_id: model.user_id,
            expires_at: model.expires_at,
        }))
    }

    async fn delete(&self, token: Uuid) -> AppResult<bool> {
        let result = TokenEntity::delete_by_id(token).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = TokenEntity::delete_many()
            .filter(refresh_token::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = TokenEntity::delete_many()
            .filter(refresh_token::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
