//! Feedback repository. Feedback rows are immutable; admins can only
//! list and remove them, so removal is a hard delete.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::feedback;
use crate::domain::feedback::{Feedback, FeedbackKind};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create(
        &self,
        email: String,
        kind: FeedbackKind,
        message: String,
        created_by: Uuid,
    ) -> AppResult<Feedback>;

    /// Duplicate guard: identical email, kind and message.
    async fn exists_duplicate(
        &self,
        email: &str,
        kind: FeedbackKind,
        message: &str,
    ) -> AppResult<bool>;

    async fn list(
        &self,
        kind: Option<FeedbackKind>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Feedback>, u64)>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct FeedbackStore {
    db: DatabaseConnection,
}

impl FeedbackStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FeedbackRepository for FeedbackStore {
    async fn create(
        &self,
        email: String,
        kind: FeedbackKind,
        message: String,
        created_by: Uuid,
    ) -> AppResult<Feedback> {
        let model = feedback::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            kind: Set(kind.as_str().to_string()),
            message: Set(message),
            created_by: Set(created_by),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Feedback::from(model))
    }

    async fn exists_duplicate(
        &self,
        email: &str,
        kind: FeedbackKind,
        message: &str,
    ) -> AppResult<bool> {
        let count = feedback::Entity::find()
            .filter(feedback::Column::Email.eq(email))
            .filter(feedback::Column::Kind.eq(kind.as_str()))
            .filter(feedback::Column::Message.eq(message))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn list(
        &self,
        kind: Option<FeedbackKind>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Feedback>, u64)> {
        let mut query = feedback::Entity::find();

        if let Some(kind) = kind {
            query = query.filter(feedback::Column::Kind.eq(kind.as_str()));
        }

        let query = query.order_by(feedback::Column::CreatedAt, params.sort_order());
        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(Feedback::from).collect(), total))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = feedback::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Feedback"));
        }
        Ok(())
    }
}
