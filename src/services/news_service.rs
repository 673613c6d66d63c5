//! News publishing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::news::{News, NewNews, NewsPatch};
use crate::domain::{CurrentUser, Permission, Upload};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::NewsRepository;
use crate::infra::AssetStore;
use crate::types::{Paginated, PaginationParams};

/// Fields for publishing a news item.
#[derive(Debug, Clone)]
pub struct CreateNews {
    pub title: String,
    pub body: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub image: Option<Upload>,
}

#[async_trait]
pub trait NewsService: Send + Sync {
    async fn create(&self, actor: &CurrentUser, input: CreateNews) -> AppResult<News>;

    /// Public: one item, expired included so old links keep working.
    async fn get(&self, id: Uuid) -> AppResult<News>;

    /// Public feed: unexpired items only.
    async fn list_public(&self, params: PaginationParams) -> AppResult<Paginated<News>>;

    /// Admin listing, expired included.
    async fn list_all(
        &self,
        actor: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<News>>;

    /// Admin edit. A new image replaces the stored file.
    async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        patch: NewsPatch,
        image: Option<Upload>,
    ) -> AppResult<News>;

    /// Admin delete. The stored image is removed.
    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;

    /// Soft-delete every item past its expiry, purging images. Returns
    /// how many items were swept.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

fn require_manage(actor: &CurrentUser) -> AppResult<()> {
    if !actor.allows(Permission::ManageNews) {
        return Err(AppError::forbidden("Only administrators may manage news"));
    }
    Ok(())
}

/// Concrete implementation of [`NewsService`].
pub struct NewsRoom {
    news: Arc<dyn NewsRepository>,
    assets: Arc<dyn AssetStore>,
}

impl NewsRoom {
    pub fn new(news: Arc<dyn NewsRepository>, assets: Arc<dyn AssetStore>) -> Self {
        Self { news, assets }
    }

    async fn purge_image(&self, url: &str) {
        if let Err(err) = self.assets.delete(url).await {
            tracing::warn!(error = %err, url, "Failed to remove stored news image");
        }
    }
}

#[async_trait]
impl NewsService for NewsRoom {
    async fn create(&self, actor: &CurrentUser, input: CreateNews) -> AppResult<News> {
        require_manage(actor)?;

        if let Some(expires_at) = input.expires_at {
            if expires_at <= Utc::now() {
                return Err(AppError::validation("Expiry must be in the future"));
            }
        }

        let image_url = match input.image {
            Some(upload) => Some(self.assets.store(upload.bytes, &upload.file_name).await?),
            None => None,
        };

        let item = self
            .news
            .create(NewNews {
                title: input.title,
                body: input.body,
                image_url,
                expires_at: input.expires_at,
                created_by: actor.id,
            })
            .await?;

        tracing::info!(news_id = %item.id, title = %item.title, "News item published");

        Ok(item)
    }

    async fn get(&self, id: Uuid) -> AppResult<News> {
        self.news
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("News item"))
    }

    async fn list_public(&self, params: PaginationParams) -> AppResult<Paginated<News>> {
        let (items, total) = self.news.list_public(Utc::now(), &params).await?;
        Ok(Paginated::new(items, params.page, params.limit(), total))
    }

    async fn list_all(
        &self,
        actor: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<News>> {
        require_manage(actor)?;

        let (items, total) = self.news.list_all(&params).await?;
        Ok(Paginated::new(items, params.page, params.limit(), total))
    }

    async fn update(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        mut patch: NewsPatch,
        image: Option<Upload>,
    ) -> AppResult<News> {
        require_manage(actor)?;

        if let Some(expires_at) = patch.expires_at {
            if expires_at <= Utc::now() {
                return Err(AppError::validation("Expiry must be in the future"));
            }
        }

        let existing = self.get(id).await?;

        if let Some(upload) = image {
            patch.image_url = Some(self.assets.store(upload.bytes, &upload.file_name).await?);
        }

        let updated = self.news.update(id, patch).await?;

        if let Some(old) = &existing.image_url {
            if updated.image_url.as_deref() != Some(old.as_str()) {
                self.purge_image(old).await;
            }
        }

        Ok(updated)
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_manage(actor)?;

        let deleted = self.news.soft_delete(id, actor.id).await?;
        if let Some(url) = &deleted.image_url {
            self.purge_image(url).await;
        }

        tracing::info!(news_id = %id, "News item deleted");

        Ok(())
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let expired = self.news.find_expired(now).await?;
        let mut swept = 0;

        for item in expired {
            // The nil uuid stands in for the maintenance sweep itself.
            let deleted = self.news.soft_delete(item.id, Uuid::nil()).await?;
            if let Some(url) = &deleted.image_url {
                self.purge_image(url).await;
            }
            swept += 1;
        }

        if swept > 0 {
            tracing::info!(swept, "Swept expired news items");
        }

        Ok(swept)
    }
}
