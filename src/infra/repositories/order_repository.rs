//! Order repositories for the two parallel order families.
//!
//! Same compare-and-set transition discipline as reports. The two
//! stores are kept explicit rather than generic; they differ in payload
//! columns and it keeps the mocks simple.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{customer_order, service_order};
use super::scope::scope_condition;
use crate::domain::order::{
    CustomerOrder, CustomerOrderPatch, NewCustomerOrder, NewServiceOrder, ServiceOrder,
    ServiceOrderPatch,
};
use crate::domain::status::OrderStatus;
use crate::domain::AuthorityScope;
use crate::errors::{AppResult, OptionExt};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub country: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ServiceOrderRepository: Send + Sync {
    async fn create(&self, new: NewServiceOrder) -> AppResult<ServiceOrder>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ServiceOrder>>;

    async fn list(
        &self,
        scope: AuthorityScope,
        filter: OrderFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<ServiceOrder>, u64)>;

    async fn update(&self, id: Uuid, patch: ServiceOrderPatch) -> AppResult<ServiceOrder>;

    async fn transition(&self, id: Uuid, from: OrderStatus, to: OrderStatus) -> AppResult<bool>;

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CustomerOrderRepository: Send + Sync {
    async fn create(&self, new: NewCustomerOrder) -> AppResult<CustomerOrder>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CustomerOrder>>;

    async fn list(
        &self,
        scope: AuthorityScope,
        filter: OrderFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<CustomerOrder>, u64)>;

    async fn update(&self, id: Uuid, patch: CustomerOrderPatch) -> AppResult<CustomerOrder>;

    async fn transition(&self, id: Uuid, from: OrderStatus, to: OrderStatus) -> AppResult<bool>;

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()>;
}

pub struct ServiceOrderStore {
    db: DatabaseConnection,
}

impl ServiceOrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn sort_column(params: &PaginationParams) -> service_order::Column {
        match params.sort_by.as_deref() {
            Some("status") => service_order::Column::Status,
            Some("country") => service_order::Column::Country,
            Some("updated_at") => service_order::Column::UpdatedAt,
            _ => service_order::Column::CreatedAt,
        }
    }
}

#[async_trait]
impl ServiceOrderRepository for ServiceOrderStore {
    async fn create(&self, new: NewServiceOrder) -> AppResult<ServiceOrder> {
        let now = chrono::Utc::now();
        let geo = new.location.geo_ref();
        let manual = new.location.manual().cloned();

        let model = service_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            service_type: Set(new.service_type),
            description: Set(new.description),
            country: Set(new.country),
            region_id: Set(geo.region_id),
            zone_id: Set(geo.zone_id),
            woreda_id: Set(geo.woreda_id),
            manual_region: Set(manual.as_ref().map(|m| m.region.clone())),
            manual_zone: Set(manual.as_ref().map(|m| m.zone.clone())),
            manual_woreda: Set(manual.map(|m| m.woreda)),
            document_url: Set(new.document_url),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            created_by: Set(new.created_by),
            is_deleted: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(ServiceOrder::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ServiceOrder>> {
        let result = service_order::Entity::find_by_id(id)
            .filter(service_order::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(ServiceOrder::from))
    }

    async fn list(
        &self,
        scope: AuthorityScope,
        filter: OrderFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<ServiceOrder>, u64)> {
        let mut query =
            service_order::Entity::find().filter(service_order::Column::IsDeleted.eq(false));

        if let Some(condition) = scope_condition(
            scope,
            service_order::Column::RegionId,
            service_order::Column::ZoneId,
            service_order::Column::WoredaId,
            service_order::Column::CreatedBy,
        ) {
            query = query.filter(condition);
        }
        if let Some(status) = filter.status {
            query = query.filter(service_order::Column::Status.eq(status.as_str()));
        }
        if let Some(country) = &filter.country {
            query = query.filter(service_order::Column::Country.eq(country));
        }

        let query = query.order_by(Self::sort_column(params), params.sort_order());
        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(ServiceOrder::from).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: ServiceOrderPatch) -> AppResult<ServiceOrder> {
        let found = service_order::Entity::find_by_id(id)
            .filter(service_order::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Service order")?;

        let mut active: service_order::ActiveModel = found.into();
        if let Some(service_type) = patch.service_type {
            active.service_type = Set(service_type);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(document_url) = patch.document_url {
            active.document_url = Set(Some(document_url));
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(ServiceOrder::from(active.update(&self.db).await?))
    }

    async fn transition(&self, id: Uuid, from: OrderStatus, to: OrderStatus) -> AppResult<bool> {
        let result = service_order::Entity::update_many()
            .col_expr(service_order::Column::Status, Expr::value(to.as_str()))
            .col_expr(
                service_order::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(service_order::Column::Id.eq(id))
            .filter(service_order::Column::Status.eq(from.as_str()))
            .filter(service_order::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        let found = service_order::Entity::find_by_id(id)
            .filter(service_order::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Service order")?;

        let mut active: service_order::ActiveModel = found.into();
        let now = chrono::Utc::now();
        active.is_deleted = Set(true);
        active.deleted_by = Set(Some(deleted_by));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }
}

pub struct CustomerOrderStore {
    db: DatabaseConnection,
}

impl CustomerOrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn sort_column(params: &PaginationParams) -> customer_order::Column {
        match params.sort_by.as_deref() {
            Some("status") => customer_order::Column::Status,
            Some("country") => customer_order::Column::Country,
            Some("updated_at") => customer_order::Column::UpdatedAt,
            _ => customer_order::Column::CreatedAt,
        }
    }
}

#[async_trait]
impl CustomerOrderRepository for CustomerOrderStore {
    async fn create(&self, new: NewCustomerOrder) -> AppResult<CustomerOrder> {
        let now = chrono::Utc::now();
        let geo = new.location.geo_ref();
        let manual = new.location.manual().cloned();

        let model = customer_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            item: Set(new.item),
            quantity: Set(new.quantity),
            description: Set(new.description),
            country: Set(new.country),
            region_id: Set(geo.region_id),
            zone_id: Set(geo.zone_id),
            woreda_id: Set(geo.woreda_id),
            manual_region: Set(manual.as_ref().map(|m| m.region.clone())),
            manual_zone: Set(manual.as_ref().map(|m| m.zone.clone())),
            manual_woreda: Set(manual.map(|m| m.woreda)),
            document_url: Set(new.document_url),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            created_by: Set(new.created_by),
            is_deleted: Set(false),
            deleted_by: Set(None),
            deleted_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        Ok(CustomerOrder::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CustomerOrder>> {
        let result = customer_order::Entity::find_by_id(id)
            .filter(customer_order::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;

        Ok(result.map(CustomerOrder::from))
    }

    async fn list(
        &self,
        scope: AuthorityScope,
        filter: OrderFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<CustomerOrder>, u64)> {
        let mut query =
            customer_order::Entity::find().filter(customer_order::Column::IsDeleted.eq(false));

        if let Some(condition) = scope_condition(
            scope,
            customer_order::Column::RegionId,
            customer_order::Column::ZoneId,
            customer_order::Column::WoredaId,
            customer_order::Column::CreatedBy,
        ) {
            query = query.filter(condition);
        }
        if let Some(status) = filter.status {
            query = query.filter(customer_order::Column::Status.eq(status.as_str()));
        }
        if let Some(country) = &filter.country {
            query = query.filter(customer_order::Column::Country.eq(country));
        }

        let query = query.order_by(Self::sort_column(params), params.sort_order());
        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.zero_indexed_page()).await?;

        Ok((models.into_iter().map(CustomerOrder::from).collect(), total))
    }

    async fn update(&self, id: Uuid, patch: CustomerOrderPatch) -> AppResult<CustomerOrder> {
        let found = customer_order::Entity::find_by_id(id)
            .filter(customer_order::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Customer order")?;

        let mut active: customer_order::ActiveModel = found.into();
        if let Some(item) = patch.item {
            active.item = Set(item);
        }
        if let Some(quantity) = patch.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(document_url) = patch.document_url {
            active.document_url = Set(Some(document_url));
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(CustomerOrder::from(active.update(&self.db).await?))
    }

    async fn transition(&self, id: Uuid, from: OrderStatus, to: OrderStatus) -> AppResult<bool> {
        let result = customer_order::Entity::update_many()
            .col_expr(customer_order::Column::Status, Expr::value(to.as_str()))
            .col_expr(
                customer_order::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(customer_order::Column::Id.eq(id))
            .filter(customer_order::Column::Status.eq(from.as_str()))
            .filter(customer_order::Column::IsDeleted.eq(false))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid, deleted_by: Uuid) -> AppResult<()> {
        let found = customer_order::Entity::find_by_id(id)
            .filter(customer_order::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?
            .ok_or_not_found("Customer order")?;

        let mut active: customer_order::ActiveModel = found.into();
        let now = chrono::Utc::now();
        active.is_deleted = Set(true);
        active.deleted_by = Set(Some(deleted_by));
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);

        active.update(&self.db).await?;
        Ok(())
    }
}
