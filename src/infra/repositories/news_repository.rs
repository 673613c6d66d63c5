//! News repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::news;
use crate::domain::news::{News, NewNews, NewsPatch};
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn create(&self, new: NewNews) -> AppResult<News>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<News>>;

    /// Public feed: not deleted, not expired as of `now`.
    async fn list_public(
        &self,
        now: DateTime<Utc>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<News>, u64)>;

    /// Admin listing: everything not deleted, expired included.
    async fn list_all(&self, params: &PaginationParams) -> AppResult<(Vec<News>, u64)>;

    async fn update(&self, id: Uuid, patch: NewsPatch) -> AppResult<News>;

    /// Soft delete, returning the row so the caller can purge its image.
    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<News>;

    /// All expired items not yet deleted, for the maintenance sweep.
    async fn find_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<News>>;
}

pub struct NewsStore {
    db: DatabaseConnection,
}

impl NewsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NewsRepository for NewsStore {
    async fn create(&self, new: NewNews) -> AppResult<News> {
        let now = chrono::Utc::now();
        let model = news::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new.title),
            body: Set(new.body),
            image_url: Set(new.image_url),
            expires_at: Set(new.expires_at),
            created_by: Set(new.created_by),
            is_deleted: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(News::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<News>> {
        let result = news::Entity::find_by_id(id)
            .filter(news::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(News::from))
    }

    async fn list_public(
        &self,
        now: DateTime<Utc>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<News>, u64)> {
        let query = news::Entity::find()
            .filter(news::Column::IsDeleted.eq(false))
            .filter(
                Condition::any()
                    .add(news::Column::ExpiresAt.is_null())
                    .add(news::Column::ExpiresAt.gt(now)),
            )
            .order_by(news::Column::CreatedAt, params.sort_order());

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(News::from).collect(), total))
    }

    async fn list_all(&self, params: &PaginationParams) -> AppResult<(Vec<News>, u64)> {
        let query = news::Entity::find()
            .filter(news::Column::IsDeleted.eq(false))
            .order_by(news::Column::CreatedAt, params.sort_order());

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(News::from).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: NewsPatch) -> AppResult<News> {
        let found = news::Entity::find_by_id(id)
            .filter(news::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("News item")?;

        let mut active: news::ActiveModel = found.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(body) = patch.body {
            active.body = Set(body);
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(expires_at) = patch.expires_at {
            active.expires_at = Set(Some(expires_at));
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(News::from(active.update(&self.db).await?))
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<News> {
        let found = news::Entity::find_by_id(id)
            .filter(news::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("News item")?;

        let mut active: news::ActiveModel = found.into();
        let now = chrono::Utc::now();
        active.is_deleted = Set(true);
        active.deleted_by = Set(Some(deleted_by));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        Ok(News::from(active.update(&self.db).await?))
    }

    async fn find_expired(&self, now: DateTime<Utc>) -> AppResult<Vec<News>> {
        let models = news::Entity::find()
            .filter(news::Column::IsDeleted.eq(false))
            .filter(news::Column::ExpiresAt.is_not_null())
            .filter(news::Column::ExpiresAt.lte(now))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(News::from).collect())
    }
}
