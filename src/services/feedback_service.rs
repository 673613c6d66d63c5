//! Feedback collection.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::feedback::{Feedback, FeedbackKind};
use crate::domain::{CurrentUser, Permission};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::FeedbackRepository;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait FeedbackService: Send + Sync {
    /// Leave feedback. Exact resubmissions are rejected.
    async fn create(
        &self,
        current: &CurrentUser,
        email: String,
        kind: FeedbackKind,
        message: String,
    ) -> AppResult<Feedback>;

    async fn list(
        &self,
        actor: &CurrentUser,
        kind: Option<FeedbackKind>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Feedback>>;

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
}

fn require_moderate(actor: &CurrentUser) -> AppResult<()> {
    if !actor.allows(Permission::ModerateFeedback) {
        return Err(AppError::forbidden("Only administrators may review feedback"));
    }
    Ok(())
}

/// Concrete implementation of [`FeedbackService`].
pub struct FeedbackManager {
    feedback: Arc<dyn FeedbackRepository>,
}

impl FeedbackManager {
    pub fn new(feedback: Arc<dyn FeedbackRepository>) -> Self {
        Self { feedback }
    }
}

#[async_trait]
impl FeedbackService for FeedbackManager {
    async fn create(
        &self,
        current: &CurrentUser,
        email: String,
        kind: FeedbackKind,
        message: String,
    ) -> AppResult<Feedback> {
        let message = message.trim().to_string();
        if message.is_empty() {
            return Err(AppError::validation("Message must not be empty"));
        }

        if self.feedback.exists_duplicate(&email, kind, &message).await? {
            return Err(AppError::conflict("Feedback"));
        }

        let feedback = self
            .feedback
            .create(email, kind, message, current.id)
            .await?;

        tracing::info!(feedback_id = %feedback.id, kind = %feedback.kind, "Feedback received");

        Ok(feedback)
    }

    async fn list(
        &self,
        actor: &CurrentUser,
        kind: Option<FeedbackKind>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Feedback>> {
        require_moderate(actor)?;

        let (items, total) = self.feedback.list(kind, &params).await?;
        Ok(Paginated::new(items, params.page, params.limit(), total))
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_moderate(actor)?;
        self.feedback.delete(id).await?;

        tracing::info!(feedback_id = %id, "Feedback deleted");

        Ok(())
    }
}
