//! Statistics queries: grouped status counts per entity family.
//!
//! Counting happens in the database; the service layer only arranges
//! the numbers into time buckets. Soft-deleted rows never count.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QuerySelect,
};

use super::entities::{
    agent_request, customer_order, feedback, job_application, partnership, report, service_order,
    user,
};
use super::scope::{owner_condition, scope_condition};
use crate::domain::AuthorityScope;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Closed interval: rows with `start <= created_at <= end` count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Row count for one status value.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, serde::Serialize, utoipa::ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn report_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>>;

    async fn service_order_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>>;

    async fn customer_order_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>>;

    async fn agent_request_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>>;

    async fn application_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>>;

    async fn partnership_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>>;

    async fn user_count(&self, range: Option<TimeRange>) -> AppResult<u64>;

    async fn feedback_count(&self, range: Option<TimeRange>) -> AppResult<u64>;
}

pub struct StatsStore {
    db: DatabaseConnection,
}

impl StatsStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StatsRepository for StatsStore {
    async fn report_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>> {
        let mut query = report::Entity::find()
            .select_only()
            .column(report::Column::Status)
            .column_as(report::Column::Id.count(), "count")
            .filter(report::Column::IsDeleted.eq(false));

        if let Some(condition) = scope_condition(
            scope,
            report::Column::RegionId,
            report::Column::ZoneId,
            report::Column::WoredaId,
            report::Column::CreatedBy,
        ) {
            query = query.filter(condition);
        }
        if let Some(range) = range {
            query = query
                .filter(report::Column::CreatedAt.gte(range.start))
                .filter(report::Column::CreatedAt.lte(range.end));
        }

        Ok(query
            .group_by(report::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.db)
            .await?)
    }

    async fn service_order_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>> {
        let mut query = service_order::Entity::find()
            .select_only()
            .column(service_order::Column::Status)
            .column_as(service_order::Column::Id.count(), "count")
            .filter(service_order::Column::IsDeleted.eq(false));

        if let Some(condition) = scope_condition(
            scope,
            service_order::Column::RegionId,
            service_order::Column::ZoneId,
            service_order::Column::WoredaId,
            service_order::Column::CreatedBy,
        ) {
            query = query.filter(condition);
        }
        if let Some(range) = range {
            query = query
                .filter(service_order::Column::CreatedAt.gte(range.start))
                .filter(service_order::Column::CreatedAt.lte(range.end));
        }

        Ok(query
            .group_by(service_order::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.db)
            .await?)
    }

    async fn customer_order_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>> {
        let mut query = customer_order::Entity::find()
            .select_only()
            .column(customer_order::Column::Status)
            .column_as(customer_order::Column::Id.count(), "count")
            .filter(customer_order::Column::IsDeleted.eq(false));

        if let Some(condition) = scope_condition(
            scope,
            customer_order::Column::RegionId,
            customer_order::Column::ZoneId,
            customer_order::Column::WoredaId,
            customer_order::Column::CreatedBy,
        ) {
            query = query.filter(condition);
        }
        if let Some(range) = range {
            query = query
                .filter(customer_order::Column::CreatedAt.gte(range.start))
                .filter(customer_order::Column::CreatedAt.lte(range.end));
        }

        Ok(query
            .group_by(customer_order::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.db)
            .await?)
    }

    async fn agent_request_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>> {
        let mut query = agent_request::Entity::find()
            .select_only()
            .column(agent_request::Column::Status)
            .column_as(agent_request::Column::Id.count(), "count")
            .filter(agent_request::Column::IsDeleted.eq(false));

        if let Some(condition) = scope_condition(
            scope,
            agent_request::Column::RegionId,
            agent_request::Column::ZoneId,
            agent_request::Column::WoredaId,
            agent_request::Column::CreatedBy,
        ) {
            query = query.filter(condition);
        }
        if let Some(range) = range {
            query = query
                .filter(agent_request::Column::CreatedAt.gte(range.start))
                .filter(agent_request::Column::CreatedAt.lte(range.end));
        }

        Ok(query
            .group_by(agent_request::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.db)
            .await?)
    }

    async fn application_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>> {
        let mut query = job_application::Entity::find()
            .select_only()
            .column(job_application::Column::Status)
            .column_as(job_application::Column::Id.count(), "count")
            .filter(job_application::Column::IsDeleted.eq(false));

        if let Some(condition) = owner_condition(scope, job_application::Column::CreatedBy) {
            query = query.filter(condition);
        }
        if let Some(range) = range {
            query = query
                .filter(job_application::Column::CreatedAt.gte(range.start))
                .filter(job_application::Column::CreatedAt.lte(range.end));
        }

        Ok(query
            .group_by(job_application::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.db)
            .await?)
    }

    async fn partnership_counts(
        &self,
        scope: AuthorityScope,
        range: Option<TimeRange>,
    ) -> AppResult<Vec<StatusCount>> {
        let mut query = partnership::Entity::find()
            .select_only()
            .column(partnership::Column::Status)
            .column_as(partnership::Column::Id.count(), "count")
            .filter(partnership::Column::IsDeleted.eq(false));

        if let Some(condition) = owner_condition(scope, partnership::Column::CreatedBy) {
            query = query.filter(condition);
        }
        if let Some(range) = range {
            query = query
                .filter(partnership::Column::CreatedAt.gte(range.start))
                .filter(partnership::Column::CreatedAt.lte(range.end));
        }

        Ok(query
            .group_by(partnership::Column::Status)
            .into_model::<StatusCount>()
            .all(&self.db)
            .await?)
    }

    async fn user_count(&self, range: Option<TimeRange>) -> AppResult<u64> {
        let mut query = user::Entity::find().filter(user::Column::IsDeleted.eq(false));

        if let Some(range) = range {
            query = query
                .filter(user::Column::CreatedAt.gte(range.start))
                .filter(user::Column::CreatedAt.lte(range.end));
        }

        Ok(query.count(&self.db).await?)
    }

    async fn feedback_count(&self, range: Option<TimeRange>) -> AppResult<u64> {
        let mut query = feedback::Entity::find();

        if let Some(range) = range {
            query = query
                .filter(feedback::Column::CreatedAt.gte(range.start))
                .filter(feedback::Column::CreatedAt.lte(range.end));
        }

        Ok(query.count(&self.db).await?)
    }
}
