//! Order handlers for the two order families.
//!
//! Both families take `multipart/form-data` on create and owner
//! update so a supporting document can ride along. The location block
//! is either reference UUIDs (covered country) or free-text names
//! (foreign orders); the service layer applies the country rule.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::extractors::{broken_multipart, file_field, parse_uuid, required, text_field};
use crate::api::AppState;
use crate::domain::{
    CurrentUser, CustomerOrder, CustomerOrderPatch, OrderStatus, ServiceOrder, ServiceOrderPatch,
    Upload,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::OrderFilter;
use crate::services::{CreateCustomerOrder, CreateServiceOrder, LocationInput};
use crate::types::{ApiResponse, Created, Paginated, PaginationParams};

/// Staff transition payload, shared by both families.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub country: Option<String>,
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/services",
            post(create_service_order).get(list_service_orders),
        )
        .route(
            "/services/:id",
            get(get_service_order)
                .put(update_service_order)
                .delete(delete_service_order),
        )
        .route("/services/:id/cancel", post(cancel_service_order))
        .route("/services/:id/status", post(transition_service_order))
        .route(
            "/customers",
            post(create_customer_order).get(list_customer_orders),
        )
        .route(
            "/customers/:id",
            get(get_customer_order)
                .put(update_customer_order)
                .delete(delete_customer_order),
        )
        .route("/customers/:id/cancel", post(cancel_customer_order))
        .route("/customers/:id/status", post(transition_customer_order))
}

/// Accumulates multipart parts; each family reads the fields it knows.
#[derive(Default)]
struct OrderForm {
    service_type: Option<String>,
    item: Option<String>,
    quantity: Option<String>,
    description: Option<String>,
    country: Option<String>,
    region_id: Option<String>,
    zone_id: Option<String>,
    woreda_id: Option<String>,
    manual_region: Option<String>,
    manual_zone: Option<String>,
    manual_woreda: Option<String>,
    document: Option<Upload>,
}

impl OrderForm {
    async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(broken_multipart)? {
            match field.name().unwrap_or_default() {
                "service_type" => form.service_type = Some(text_field(field).await?),
                "item" => form.item = Some(text_field(field).await?),
                "quantity" => form.quantity = Some(text_field(field).await?),
                "description" => form.description = Some(text_field(field).await?),
                "country" => form.country = Some(text_field(field).await?),
                "region_id" => form.region_id = Some(text_field(field).await?),
                "zone_id" => form.zone_id = Some(text_field(field).await?),
                "woreda_id" => form.woreda_id = Some(text_field(field).await?),
                "manual_region" => form.manual_region = Some(text_field(field).await?),
                "manual_zone" => form.manual_zone = Some(text_field(field).await?),
                "manual_woreda" => form.manual_woreda = Some(text_field(field).await?),
                "document" => form.document = Some(file_field(field).await?),
                _ => {}
            }
        }

        Ok(form)
    }

    fn location(&self) -> AppResult<LocationInput> {
        Ok(LocationInput {
            region_id: self.optional_uuid(&self.region_id, "region_id")?,
            zone_id: self.optional_uuid(&self.zone_id, "zone_id")?,
            woreda_id: self.optional_uuid(&self.woreda_id, "woreda_id")?,
            manual_region: self.manual_region.clone(),
            manual_zone: self.manual_zone.clone(),
            manual_woreda: self.manual_woreda.clone(),
        })
    }

    fn optional_uuid(&self, value: &Option<String>, name: &str) -> AppResult<Option<Uuid>> {
        value.as_deref().map(|v| parse_uuid(v, name)).transpose()
    }

    fn parsed_quantity(&self) -> AppResult<Option<i32>> {
        self.quantity
            .as_deref()
            .map(|raw| {
                raw.parse::<i32>()
                    .map_err(|_| AppError::validation("Quantity must be a whole number"))
            })
            .transpose()
    }
}

/// Place a service order
#[utoipa::path(
    post,
    path = "/orders/services",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Placed order", body = ServiceOrder),
        (status = 400, description = "Missing field or location breaks the country rule")
    )
)]
pub async fn create_service_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Created<ServiceOrder>> {
    let form = OrderForm::read(multipart).await?;

    let input = CreateServiceOrder {
        service_type: required(form.service_type.clone(), "service_type")?,
        description: required(form.description.clone(), "description")?,
        country: required(form.country.clone(), "country")?,
        location: form.location()?,
        document: form.document,
    };

    let order = state
        .services
        .service_orders()
        .create(&current, input)
        .await?;

    Ok(Created(order))
}

/// List service orders in the caller's scope
#[utoipa::path(
    get,
    path = "/orders/services",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<OrderStatus>, Query, description = "Filter by status"),
        ("country" = Option<String>, Query, description = "Filter by country"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Paginated service orders"))
)]
pub async fn list_service_orders(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ServiceOrder>>> {
    let filter = OrderFilter {
        status: query.status,
        country: query.country,
    };

    let page = state
        .services
        .service_orders()
        .list(&current, filter, pagination)
        .await?;

    Ok(Json(page))
}

/// Fetch one service order
#[utoipa::path(
    get,
    path = "/orders/services/{id}",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "The order", body = ServiceOrder),
        (status = 404, description = "Not found or outside the caller's scope")
    )
)]
pub async fn get_service_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ServiceOrder>> {
    let order = state.services.service_orders().get(&current, id).await?;

    Ok(Json(order))
}

/// Edit an own service order while pending or reviewed
#[utoipa::path(
    put,
    path = "/orders/services/{id}",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated order", body = ServiceOrder),
        (status = 403, description = "Not the customer"),
        (status = 409, description = "No longer editable")
    )
)]
pub async fn update_service_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ServiceOrder>> {
    let form = OrderForm::read(multipart).await?;

    let patch = ServiceOrderPatch {
        service_type: form.service_type.clone(),
        description: form.description.clone(),
        ..Default::default()
    };

    let order = state
        .services
        .service_orders()
        .update_own(&current, id, patch, form.document)
        .await?;

    Ok(Json(order))
}

/// Cancel an own service order
#[utoipa::path(
    post,
    path = "/orders/services/{id}/cancel",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Cancelled order", body = ServiceOrder),
        (status = 403, description = "Not the customer"),
        (status = 409, description = "No longer cancellable")
    )
)]
pub async fn cancel_service_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ServiceOrder>> {
    let order = state
        .services
        .service_orders()
        .cancel_own(&current, id)
        .await?;

    Ok(Json(order))
}

/// Staff status transition
#[utoipa::path(
    post,
    path = "/orders/services/{id}/status",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = OrderStatusRequest,
    responses(
        (status = 200, description = "Order after the transition", body = ServiceOrder),
        (status = 403, description = "Outside the caller's administrative area"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn transition_service_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderStatusRequest>,
) -> AppResult<Json<ServiceOrder>> {
    let order = state
        .services
        .service_orders()
        .transition(&current, id, payload.status)
        .await?;

    Ok(Json(order))
}

/// Staff soft delete. The document is retained.
#[utoipa::path(
    delete,
    path = "/orders/services/{id}",
    tag = "Service orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 403, description = "Outside the caller's administrative area"),
        (status = 404, description = "No such order")
    )
)]
pub async fn delete_service_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.service_orders().delete(&current, id).await?;

    Ok(ApiResponse::message("Order deleted"))
}

/// Place a customer order
#[utoipa::path(
    post,
    path = "/orders/customers",
    tag = "Customer orders",
    security(("bearer_auth" = [])),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Placed order", body = CustomerOrder),
        (status = 400, description = "Missing field, bad quantity or wrong location shape")
    )
)]
pub async fn create_customer_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Created<CustomerOrder>> {
    let form = OrderForm::read(multipart).await?;

    let quantity = form
        .parsed_quantity()?
        .ok_or_else(|| AppError::validation("Missing field: quantity"))?;

    let input = CreateCustomerOrder {
        item: required(form.item.clone(), "item")?,
        quantity,
        description: required(form.description.clone(), "description")?,
        country: required(form.country.clone(), "country")?,
        location: form.location()?,
        document: form.document,
    };

    let order = state
        .services
        .customer_orders()
        .create(&current, input)
        .await?;

    Ok(Created(order))
}

/// List customer orders in the caller's scope
#[utoipa::path(
    get,
    path = "/orders/customers",
    tag = "Customer orders",
    security(("bearer_auth" = [])),
    params(
        ("status" = Option<OrderStatus>, Query, description = "Filter by status"),
        ("country" = Option<String>, Query, description = "Filter by country"),
        ("page" = Option<u64>, Query, description = "1-indexed page"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses((status = 200, description = "Paginated customer orders"))
)]
pub async fn list_customer_orders(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<CustomerOrder>>> {
    let filter = OrderFilter {
        status: query.status,
        country: query.country,
    };

    let page = state
        .services
        .customer_orders()
        .list(&current, filter, pagination)
        .await?;

    Ok(Json(page))
}

/// Fetch one customer order
#[utoipa::path(
    get,
    path = "/orders/customers/{id}",
    tag = "Customer orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "The order", body = CustomerOrder),
        (status = 404, description = "Not found or outside the caller's scope")
    )
)]
pub async fn get_customer_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CustomerOrder>> {
    let order = state.services.customer_orders().get(&current, id).await?;

    Ok(Json(order))
}

/// Edit an own customer order while pending or reviewed
#[utoipa::path(
    put,
    path = "/orders/customers/{id}",
    tag = "Customer orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body(content = (), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated order", body = CustomerOrder),
        (status = 403, description = "Not the customer"),
        (status = 409, description = "No longer editable")
    )
)]
pub async fn update_customer_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<CustomerOrder>> {
    let form = OrderForm::read(multipart).await?;

    let patch = CustomerOrderPatch {
        item: form.item.clone(),
        quantity: form.parsed_quantity()?,
        description: form.description.clone(),
        ..Default::default()
    };

    let order = state
        .services
        .customer_orders()
        .update_own(&current, id, patch, form.document)
        .await?;

    Ok(Json(order))
}

/// Cancel an own customer order
#[utoipa::path(
    post,
    path = "/orders/customers/{id}/cancel",
    tag = "Customer orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Cancelled order", body = CustomerOrder),
        (status = 403, description = "Not the customer"),
        (status = 409, description = "No longer cancellable")
    )
)]
pub async fn cancel_customer_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CustomerOrder>> {
    let order = state
        .services
        .customer_orders()
        .cancel_own(&current, id)
        .await?;

    Ok(Json(order))
}

/// Staff status transition
#[utoipa::path(
    post,
    path = "/orders/customers/{id}/status",
    tag = "Customer orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = OrderStatusRequest,
    responses(
        (status = 200, description = "Order after the transition", body = CustomerOrder),
        (status = 403, description = "Outside the caller's administrative area"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn transition_customer_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderStatusRequest>,
) -> AppResult<Json<CustomerOrder>> {
    let order = state
        .services
        .customer_orders()
        .transition(&current, id, payload.status)
        .await?;

    Ok(Json(order))
}

/// Staff soft delete. The document is retained.
#[utoipa::path(
    delete,
    path = "/orders/customers/{id}",
    tag = "Customer orders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 403, description = "Outside the caller's administrative area"),
        (status = 404, description = "No such order")
    )
)]
pub async fn delete_customer_order(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<ApiResponse<()>> {
    state.services.customer_orders().delete(&current, id).await?;

    Ok(ApiResponse::message("Order deleted"))
}
