//! Support message threads between end users and assistants.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::message::{Message, SenderKind, ThreadSummary};
use crate::domain::{CurrentUser, Permission};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{MessageRepository, UserRepository};
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait MessageService: Send + Sync {
    /// User writes into their own thread.
    async fn send(&self, current: &CurrentUser, body: String) -> AppResult<Message>;

    /// User reads their own thread. Assistant messages in it are marked
    /// read after the page is taken, so new replies stay flagged for
    /// exactly one fetch.
    async fn my_thread(
        &self,
        current: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<Message>>;

    /// Assistant inbox over all threads.
    async fn inbox(
        &self,
        actor: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<ThreadSummary>>;

    /// Assistant reads one user's thread; that user's messages are
    /// marked read the same way.
    async fn thread(
        &self,
        actor: &CurrentUser,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<Message>>;

    /// Assistant answers into one user's thread.
    async fn reply(&self, actor: &CurrentUser, user_id: Uuid, body: String) -> AppResult<Message>;
}

fn require_answer(actor: &CurrentUser) -> AppResult<()> {
    if !actor.allows(Permission::AnswerMessages) {
        return Err(AppError::forbidden("You may not answer support messages"));
    }
    Ok(())
}

fn clean_body(body: String) -> AppResult<String> {
    let body = body.trim().to_string();
    if body.is_empty() {
        return Err(AppError::validation("Message must not be empty"));
    }
    Ok(body)
}

/// Concrete implementation of [`MessageService`].
pub struct MessageDesk {
    messages: Arc<dyn MessageRepository>,
    users: Arc<dyn UserRepository>,
}

impl MessageDesk {
    pub fn new(messages: Arc<dyn MessageRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { messages, users }
    }
}

#[async_trait]
impl MessageService for MessageDesk {
    async fn send(&self, current: &CurrentUser, body: String) -> AppResult<Message> {
        let body = clean_body(body)?;
        self.messages
            .send(current.id, SenderKind::User, current.id, body)
            .await
    }

    async fn my_thread(
        &self,
        current: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<Message>> {
        let (messages, total) = self.messages.thread(current.id, &params).await?;
        self.messages
            .mark_read(current.id, SenderKind::Assistant)
            .await?;

        Ok(Paginated::new(messages, params.page, params.limit(), total))
    }

    async fn inbox(
        &self,
        actor: &CurrentUser,
        params: PaginationParams,
    ) -> AppResult<Paginated<ThreadSummary>> {
        require_answer(actor)?;

        let (threads, total) = self.messages.summaries(&params).await?;
        Ok(Paginated::new(threads, params.page, params.limit(), total))
    }

    async fn thread(
        &self,
        actor: &CurrentUser,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<Paginated<Message>> {
        require_answer(actor)?;

        let (messages, total) = self.messages.thread(user_id, &params).await?;
        self.messages.mark_read(user_id, SenderKind::User).await?;

        Ok(Paginated::new(messages, params.page, params.limit(), total))
    }

    async fn reply(&self, actor: &CurrentUser, user_id: Uuid, body: String) -> AppResult<Message> {
        require_answer(actor)?;

        let body = clean_body(body)?;

        // Threads are keyed by the end user; answering into a thread
        // for an account that does not exist is a caller mistake.
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let message = self
            .messages
            .send(user_id, SenderKind::Assistant, actor.id, body)
            .await?;

        tracing::info!(thread = %user_id, "Assistant reply sent");

        Ok(message)
    }
}
