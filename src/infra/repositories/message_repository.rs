//! Message repository.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeUtc;
use sea_orm::sea_query::{CaseStatement, Cond, Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::message;
use crate::domain::message::{Message, SenderKind, ThreadSummary};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, FromQueryResult)]
struct ThreadSummaryRow {
    user_id: Uuid,
    last_message_at: DateTimeUtc,
    unread_count: i64,
}

impl From<ThreadSummaryRow> for ThreadSummary {
    fn from(row: ThreadSummaryRow) -> Self {
        ThreadSummary {
            user_id: row.user_id,
            last_message_at: row.last_message_at,
            unread_count: row.unread_count,
        }
    }
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn send(
        &self,
        user_id: Uuid,
        sender: SenderKind,
        sender_id: Uuid,
        body: String,
    ) -> AppResult<Message>;

    /// One user's thread, newest first by default.
    async fn thread(
        &self,
        user_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Message>, u64)>;

    /// Assistant inbox: threads with latest activity and unanswered
    /// user message counts, most recently active first.
    async fn summaries(&self, params: &PaginationParams)
        -> AppResult<(Vec<ThreadSummary>, u64)>;

    /// Mark all unread messages written by `sender` in the given thread
    /// as read. Returns how many rows flipped.
    async fn mark_read(&self, user_id: Uuid, sender: SenderKind) -> AppResult<u64>;
}

pub struct MessageStore {
    db: DatabaseConnection,
}

impl MessageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for MessageStore {
    async fn send(
        &self,
        user_id: Uuid,
        sender: SenderKind,
        sender_id: Uuid,
        body: String,
    ) -> AppResult<Message> {
        let model = message::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            sender: Set(sender.as_str().to_string()),
            sender_id: Set(sender_id),
            body: Set(body),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now()),
        }
        .insert(&self.db)
        .await?;

        Ok(Message::from(model))
    }

    async fn thread(
        &self,
        user_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Message>, u64)> {
        let query = message::Entity::find()
            .filter(message::Column::UserId.eq(user_id))
            .order_by(message::Column::CreatedAt, params.sort_order());

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(Message::from).collect(), total))
    }

    async fn summaries(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<ThreadSummary>, u64)> {
        // SUM over a CASE counts unread user-sent rows per thread.
        // int4 inputs keep the Postgres SUM result an int8.
        let unread_case = CaseStatement::new()
            .case(
                Cond::all()
                    .add(Expr::col(message::Column::Sender).eq(SenderKind::User.as_str()))
                    .add(Expr::col(message::Column::IsRead).eq(false)),
                1i32,
            )
            .finally(0i32);

        let query = message::Entity::find()
            .select_only()
            .column(message::Column::UserId)
            .column_as(message::Column::CreatedAt.max(), "last_message_at")
            .column_as(
                SimpleExpr::from(Func::sum(unread_case)),
                "unread_count",
            )
            .group_by(message::Column::UserId)
            .order_by_desc(message::Column::CreatedAt.max());

        let paginator = query
            .into_model::<ThreadSummaryRow>()
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((rows.into_iter().map(ThreadSummary::from).collect(), total))
    }

    async fn mark_read(&self, user_id: Uuid, sender: SenderKind) -> AppResult<u64> {
        let result = message::Entity::update_many()
            .col_expr(message::Column::IsRead, Expr::value(true))
            .filter(message::Column::UserId.eq(user_id))
            .filter(message::Column::Sender.eq(sender.as_str()))
            .filter(message::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
