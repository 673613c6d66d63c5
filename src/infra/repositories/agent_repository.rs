//! Agent request repository.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::agent_request;
use super::scope::scope_condition;
use crate::domain::agent::{AgentRequest, AgentRequestPatch, NewAgentRequest};
use crate::domain::status::AgentStatus;
use crate::domain::AuthorityScope;
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AgentRequestRepository: Send + Sync {
    async fn create(&self, new: NewAgentRequest) -> AppResult<AgentRequest>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AgentRequest>>;

    /// The user's request still awaiting a decision, if any.
    async fn find_open_for_user(&self, user_id: Uuid) -> AppResult<Option<AgentRequest>>;

    async fn list(
        &self,
        scope: AuthorityScope,
        status: Option<AgentStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<AgentRequest>, u64)>;

    async fn update(&self, id: Uuid, patch: AgentRequestPatch) -> AppResult<AgentRequest>;

    async fn transition(&self, id: Uuid, from: AgentStatus, to: AgentStatus) -> AppResult<bool>;

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;
}

pub struct AgentRequestStore {
    db: DatabaseConnection,
}

impl AgentRequestStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AgentRequestRepository for AgentRequestStore {
    async fn create(&self, new: NewAgentRequest) -> AppResult<AgentRequest> {
        let now = chrono::Utc::now();
        let model = agent_request::ActiveModel {
            id: Set(Uuid::new_v4()),
            region_id: Set(new.region_id),
            zone_id: Set(new.zone_id),
            woreda_id: Set(new.woreda_id),
            motivation: Set(new.motivation),
            status: Set(AgentStatus::Pending.as_str().to_string()),
            created_by: Set(new.created_by),
            is_deleted: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(AgentRequest::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AgentRequest>> {
        let result = agent_request::Entity::find_by_id(id)
            .filter(agent_request::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(AgentRequest::from))
    }

    async fn find_open_for_user(&self, user_id: Uuid) -> AppResult<Option<AgentRequest>> {
        let result = agent_request::Entity::find()
            .filter(agent_request::Column::CreatedBy.eq(user_id))
            .filter(agent_request::Column::Status.eq(AgentStatus::Pending.as_str()))
            .filter(agent_request::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(AgentRequest::from))
    }

    async fn list(
        &self,
        scope: AuthorityScope,
        status: Option<AgentStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<AgentRequest>, u64)> {
        let mut query =
            agent_request::Entity::find().filter(agent_request::Column::IsDeleted.eq(false));

        if let Some(condition) = scope_condition(
            scope,
            agent_request::Column::RegionId,
            agent_request::Column::ZoneId,
            agent_request::Column::WoredaId,
            agent_request::Column::CreatedBy,
        ) {
            query = query.filter(condition);
        }
        if let Some(status) = status {
            query = query.filter(agent_request::Column::Status.eq(status.as_str()));
        }

        let query = query.order_by(agent_request::Column::CreatedAt, params.sort_order());
        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(AgentRequest::from).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: AgentRequestPatch) -> AppResult<AgentRequest> {
        let found = agent_request::Entity::find_by_id(id)
            .filter(agent_request::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Agent request")?;

        let mut active: agent_request::ActiveModel = found.into();
        if let Some(region_id) = patch.region_id {
            active.region_id = Set(region_id);
        }
        if let Some(zone_id) = patch.zone_id {
            active.zone_id = Set(zone_id);
        }
        if let Some(woreda_id) = patch.woreda_id {
            active.woreda_id = Set(woreda_id);
        }
        if let Some(motivation) = patch.motivation {
            active.motivation = Set(motivation);
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(AgentRequest::from(active.update(&self.db).await?))
    }

    async fn transition(&self, id: Uuid, from: AgentStatus, to: AgentStatus) -> AppResult<bool> {
        let result = agent_request::Entity::update_many()
            .col_expr(agent_request::Column::Status, Expr::value(to.as_str()))
            .col_expr(
                agent_request::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(agent_request::Column::Id.eq(id))
            .filter(agent_request::Column::Status.eq(from.as_str()))
            .filter(agent_request::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        let found = agent_request::Entity::find_by_id(id)
            .filter(agent_request::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Agent request")?;

        let mut active: agent_request::ActiveModel = found.into();
        let now = chrono::Utc::now();
        active.is_deleted = Set(true);
        active.deleted_by = Set(Some(deleted_by));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }
}
