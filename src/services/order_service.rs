//! Order services for the two parallel order families.
//!
//! Service orders and customer orders share one lifecycle and one
//! country rule; like their repositories they are kept as explicit
//! twins because the payloads differ.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::geography::OrderLocation;
use crate::domain::order::{
    CustomerOrder, CustomerOrderPatch, NewCustomerOrder, NewServiceOrder, ServiceOrder,
    ServiceOrderPatch,
};
use crate::domain::status::{OrderStatus, StatusFlow};
use crate::domain::{CurrentUser, EntityKind, Permission, Upload};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    CustomerOrderRepository, GeographyRepository, OrderFilter, ServiceOrderRepository,
    UserRepository,
};
use crate::infra::AssetStore;
use crate::jobs::Notifier;
use crate::types::{Paginated, PaginationParams};

use super::geography_service::validate_chain;
use super::notify::notify_owner;

/// Raw location fields as submitted; the country rule decides which
/// family is allowed.
#[derive(Debug, Clone, Default)]
pub struct LocationInput {
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
    pub manual_region: Option<String>,
    pub manual_zone: Option<String>,
    pub manual_woreda: Option<String>,
}

/// Fields for placing a service order.
#[derive(Debug, Clone)]
pub struct CreateServiceOrder {
    pub service_type: String,
    pub description: String,
    pub country: String,
    pub location: LocationInput,
    pub document: Option<Upload>,
}

/// Fields for placing a customer order.
#[derive(Debug, Clone)]
pub struct CreateCustomerOrder {
    pub item: String,
    pub quantity: i32,
    pub description: String,
    pub country: String,
    pub location: LocationInput,
    pub document: Option<Upload>,
}

/// Service order lifecycle operations.
#[async_trait]
pub trait ServiceOrderService: Send + Sync {
    async fn create(
        &self,
        current: &CurrentUser,
        input: CreateServiceOrder,
    ) -> AppResult<ServiceOrder>;

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<ServiceOrder>;

    async fn list(
        &self,
        current: &CurrentUser,
        filter: OrderFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ServiceOrder>>;

    /// Owner edit while the order is still pending or reviewed.
    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        patch: ServiceOrderPatch,
        document: Option<Upload>,
    ) -> AppResult<ServiceOrder>;

    /// Owner cancel while the order is still pending or reviewed.
    async fn cancel_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<ServiceOrder>;

    /// Staff status transition within geographic scope.
    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: OrderStatus,
    ) -> AppResult<ServiceOrder>;

    /// Staff soft delete. The uploaded document is retained.
    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
}

/// Customer order lifecycle operations.
#[async_trait]
pub trait CustomerOrderService: Send + Sync {
    async fn create(
        &self,
        current: &CurrentUser,
        input: CreateCustomerOrder,
    ) -> AppResult<CustomerOrder>;

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<CustomerOrder>;

    async fn list(
        &self,
        current: &CurrentUser,
        filter: OrderFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<CustomerOrder>>;

    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        patch: CustomerOrderPatch,
        document: Option<Upload>,
    ) -> AppResult<CustomerOrder>;

    async fn cancel_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<CustomerOrder>;

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: OrderStatus,
    ) -> AppResult<CustomerOrder>;

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
}

/// Resolve and, for covered-country orders, validate the location.
async fn resolve_location(
    geography: &dyn GeographyRepository,
    country: &str,
    location: LocationInput,
) -> AppResult<OrderLocation> {
    let resolved = OrderLocation::resolve(
        country,
        location.region_id,
        location.zone_id,
        location.woreda_id,
        location.manual_region,
        location.manual_zone,
        location.manual_woreda,
    )?;

    if let OrderLocation::Covered(geo) = &resolved {
        validate_chain(geography, geo.region_id, geo.zone_id, geo.woreda_id).await?;
    }

    Ok(resolved)
}

/// Concrete implementation of [`ServiceOrderService`].
pub struct ServiceOrderManager {
    orders: Arc<dyn ServiceOrderRepository>,
    users: Arc<dyn UserRepository>,
    geography: Arc<dyn GeographyRepository>,
    assets: Arc<dyn AssetStore>,
    notifier: Arc<dyn Notifier>,
}

impl ServiceOrderManager {
    pub fn new(
        orders: Arc<dyn ServiceOrderRepository>,
        users: Arc<dyn UserRepository>,
        geography: Arc<dyn GeographyRepository>,
        assets: Arc<dyn AssetStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orders,
            users,
            geography,
            assets,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<ServiceOrder> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service order"))
    }

    /// Foreign orders carry no geography, so they resolve to the owner
    /// and the super admin only.
    fn visible_to(current: &CurrentUser, order: &ServiceOrder) -> bool {
        order.created_by == current.id || current.scope().contains(&order.geo_ref())
    }
}

#[async_trait]
impl ServiceOrderService for ServiceOrderManager {
    async fn create(
        &self,
        current: &CurrentUser,
        input: CreateServiceOrder,
    ) -> AppResult<ServiceOrder> {
        let location =
            resolve_location(self.geography.as_ref(), &input.country, input.location).await?;

        let document_url = match input.document {
            Some(upload) => Some(self.assets.store(upload.bytes, &upload.file_name).await?),
            None => None,
        };

        let order = self
            .orders
            .create(NewServiceOrder {
                service_type: input.service_type,
                description: input.description,
                country: input.country,
                location,
                document_url,
                created_by: current.id,
            })
            .await?;

        tracing::info!(order_id = %order.id, "Service order placed");

        Ok(order)
    }

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<ServiceOrder> {
        let order = self.load(id).await?;
        if !Self::visible_to(current, &order) {
            return Err(AppError::not_found("Service order"));
        }
        Ok(order)
    }

    async fn list(
        &self,
        current: &CurrentUser,
        filter: OrderFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<ServiceOrder>> {
        let (orders, total) = self.orders.list(current.scope(), filter, &params).await?;
        Ok(Paginated::new(orders, params.page, params.limit(), total))
    }

    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        mut patch: ServiceOrderPatch,
        document: Option<Upload>,
    ) -> AppResult<ServiceOrder> {
        let order = self.load(id).await?;

        if order.created_by != current.id {
            return Err(AppError::forbidden("Only the customer may edit this order"));
        }
        if !order.status.editable_by_owner() {
            return Err(AppError::not_editable(order.status));
        }

        if let Some(upload) = document {
            patch.document_url =
                Some(self.assets.store(upload.bytes, &upload.file_name).await?);
        }

        self.orders.update(id, patch).await
    }

    async fn cancel_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<ServiceOrder> {
        let order = self.load(id).await?;

        if order.created_by != current.id {
            return Err(AppError::forbidden(
                "Only the customer may cancel this order",
            ));
        }
        if !order.status.editable_by_owner() {
            return Err(AppError::not_editable(order.status));
        }

        let moved = self
            .orders
            .transition(id, order.status, OrderStatus::Cancelled)
            .await?;
        if !moved {
            return Err(AppError::invalid_transition(
                order.status,
                OrderStatus::Cancelled,
            ));
        }

        self.load(id).await
    }

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: OrderStatus,
    ) -> AppResult<ServiceOrder> {
        if !actor.allows(Permission::ReviewOrders) {
            return Err(AppError::forbidden("You may not review orders"));
        }

        let order = self.load(id).await?;

        if !actor.scope().contains(&order.geo_ref()) {
            return Err(AppError::forbidden(
                "This order is outside your administrative area",
            ));
        }

        order.status.transition(to)?;

        let moved = self.orders.transition(id, order.status, to).await?;
        if !moved {
            return Err(AppError::invalid_transition(order.status, to));
        }

        if to.notifies_owner() {
            notify_owner(
                self.users.as_ref(),
                self.notifier.as_ref(),
                order.created_by,
                EntityKind::ServiceOrder,
                &order.service_type,
                to.as_str(),
            )
            .await;
        }

        tracing::info!(
            order_id = %id, from = %order.status, to = %to,
            "Service order transitioned"
        );

        self.load(id).await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        if !actor.allows(Permission::ReviewOrders) {
            return Err(AppError::forbidden("You may not review orders"));
        }

        let order = self.load(id).await?;

        if !actor.scope().contains(&order.geo_ref()) {
            return Err(AppError::forbidden(
                "This order is outside your administrative area",
            ));
        }

        self.orders.soft_delete(id, actor.id).await?;

        tracing::info!(order_id = %id, "Service order deleted");

        Ok(())
    }
}

/// Concrete implementation of [`CustomerOrderService`].
pub struct CustomerOrderManager {
    orders: Arc<dyn CustomerOrderRepository>,
    users: Arc<dyn UserRepository>,
    geography: Arc<dyn GeographyRepository>,
    assets: Arc<dyn AssetStore>,
    notifier: Arc<dyn Notifier>,
}

impl CustomerOrderManager {
    pub fn new(
        orders: Arc<dyn CustomerOrderRepository>,
        users: Arc<dyn UserRepository>,
        geography: Arc<dyn GeographyRepository>,
        assets: Arc<dyn AssetStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            orders,
            users,
            geography,
            assets,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<CustomerOrder> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer order"))
    }

    fn visible_to(current: &CurrentUser, order: &CustomerOrder) -> bool {
        order.created_by == current.id || current.scope().contains(&order.geo_ref())
    }
}

#[async_trait]
impl CustomerOrderService for CustomerOrderManager {
    async fn create(
        &self,
        current: &CurrentUser,
        input: CreateCustomerOrder,
    ) -> AppResult<CustomerOrder> {
        if input.quantity <= 0 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }

        let location =
            resolve_location(self.geography.as_ref(), &input.country, input.location).await?;

        let document_url = match input.document {
            Some(upload) => Some(self.assets.store(upload.bytes, &upload.file_name).await?),
            None => None,
        };

        let order = self
            .orders
            .create(NewCustomerOrder {
                item: input.item,
                quantity: input.quantity,
                description: input.description,
                country: input.country,
                location,
                document_url,
                created_by: current.id,
            })
            .await?;

        tracing::info!(order_id = %order.id, "Customer order placed");

        Ok(order)
    }

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<CustomerOrder> {
        let order = self.load(id).await?;
        if !Self::visible_to(current, &order) {
            return Err(AppError::not_found("Customer order"));
        }
        Ok(order)
    }

    async fn list(
        &self,
        current: &CurrentUser,
        filter: OrderFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<CustomerOrder>> {
        let (orders, total) = self.orders.list(current.scope(), filter, &params).await?;
        Ok(Paginated::new(orders, params.page, params.limit(), total))
    }

    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        mut patch: CustomerOrderPatch,
        document: Option<Upload>,
    ) -> AppResult<CustomerOrder> {
        let order = self.load(id).await?;

        if order.created_by != current.id {
            return Err(AppError::forbidden("Only the customer may edit this order"));
        }
        if !order.status.editable_by_owner() {
            return Err(AppError::not_editable(order.status));
        }

        if let Some(quantity) = patch.quantity {
            if quantity <= 0 {
                return Err(AppError::validation("Quantity must be at least 1"));
            }
        }

        if let Some(upload) = document {
            patch.document_url =
                Some(self.assets.store(upload.bytes, &upload.file_name).await?);
        }

        self.orders.update(id, patch).await
    }

    async fn cancel_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<CustomerOrder> {
        let order = self.load(id).await?;

        if order.created_by != current.id {
            return Err(AppError::forbidden(
                "Only the customer may cancel this order",
            ));
        }
        if !order.status.editable_by_owner() {
            return Err(AppError::not_editable(order.status));
        }

        let moved = self
            .orders
            .transition(id, order.status, OrderStatus::Cancelled)
            .await?;
        if !moved {
            return Err(AppError::invalid_transition(
                order.status,
                OrderStatus::Cancelled,
            ));
        }

        self.load(id).await
    }

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: OrderStatus,
    ) -> AppResult<CustomerOrder> {
        if !actor.allows(Permission::ReviewOrders) {
            return Err(AppError::forbidden("You may not review orders"));
        }

        let order = self.load(id).await?;

        if !actor.scope().contains(&order.geo_ref()) {
            return Err(AppError::forbidden(
                "This order is outside your administrative area",
            ));
        }

        order.status.transition(to)?;

        let moved = self.orders.transition(id, order.status, to).await?;
        if !moved {
            return Err(AppError::invalid_transition(order.status, to));
        }

        if to.notifies_owner() {
            notify_owner(
                self.users.as_ref(),
                self.notifier.as_ref(),
                order.created_by,
                EntityKind::CustomerOrder,
                &order.item,
                to.as_str(),
            )
            .await;
        }

        tracing::info!(
            order_id = %id, from = %order.status, to = %to,
            "Customer order transitioned"
        );

        self.load(id).await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        if !actor.allows(Permission::ReviewOrders) {
            return Err(AppError::forbidden("You may not review orders"));
        }

        let order = self.load(id).await?;

        if !actor.scope().contains(&order.geo_ref()) {
            return Err(AppError::forbidden(
                "This order is outside your administrative area",
            ));
        }

        self.orders.soft_delete(id, actor.id).await?;

        tracing::info!(order_id = %id, "Customer order deleted");

        Ok(())
    }
}
