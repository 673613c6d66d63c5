//! Order service unit tests.
//!
//! The country rule is the interesting part: orders inside Ethiopia
//! must carry a validated region/zone/woreda chain, orders anywhere
//! else must carry manual location text, and the two never mix.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use hulegeb::domain::{CurrentUser, OrderStatus, Role, ServiceOrder, Upload};
use hulegeb::errors::AppError;
use hulegeb::infra::repositories::{
    MockCustomerOrderRepository, MockGeographyRepository, MockServiceOrderRepository,
    MockUserRepository,
};
use hulegeb::infra::MockAssetStore;
use hulegeb::jobs::MockNotifier;
use hulegeb::services::{
    CreateCustomerOrder, CreateServiceOrder, CustomerOrderManager, CustomerOrderService,
    LocationInput, ServiceOrderManager, ServiceOrderService,
};

fn customer(id: Uuid) -> CurrentUser {
    CurrentUser {
        id,
        email: "customer@example.com".to_string(),
        role: Role::User,
        region_id: None,
        zone_id: None,
        woreda_id: None,
    }
}

fn foreign_order(id: Uuid, created_by: Uuid, status: OrderStatus) -> ServiceOrder {
    ServiceOrder {
        id,
        service_type: "Document authentication".to_string(),
        description: "Authenticate my degree".to_string(),
        country: "Kenya".to_string(),
        region_id: None,
        zone_id: None,
        woreda_id: None,
        manual_region: Some("Nairobi County".to_string()),
        manual_zone: Some("Westlands".to_string()),
        manual_woreda: Some("Parklands".to_string()),
        document_url: None,
        status,
        created_by,
        is_deleted: false,
        deleted_by: None,
        deleted_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn service_order_manager(
    orders: MockServiceOrderRepository,
    geography: MockGeographyRepository,
    assets: MockAssetStore,
) -> ServiceOrderManager {
    ServiceOrderManager::new(
        Arc::new(orders),
        Arc::new(MockUserRepository::new()),
        Arc::new(geography),
        Arc::new(assets),
        Arc::new(MockNotifier::new()),
    )
}

// =============================================================================
// Country rule
// =============================================================================

#[tokio::test]
async fn test_create_rejects_manual_text_inside_covered_country() {
    let service = service_order_manager(
        MockServiceOrderRepository::new(),
        MockGeographyRepository::new(),
        MockAssetStore::new(),
    );

    let result = service
        .create(
            &customer(Uuid::new_v4()),
            CreateServiceOrder {
                service_type: "Document authentication".to_string(),
                description: "Authenticate my degree".to_string(),
                country: "Ethiopia".to_string(),
                location: LocationInput {
                    manual_region: Some("Somewhere".to_string()),
                    ..Default::default()
                },
                document: None,
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_requires_full_chain_inside_covered_country() {
    let service = service_order_manager(
        MockServiceOrderRepository::new(),
        MockGeographyRepository::new(),
        MockAssetStore::new(),
    );

    // Region and zone but no woreda.
    let result = service
        .create(
            &customer(Uuid::new_v4()),
            CreateServiceOrder {
                service_type: "Document authentication".to_string(),
                description: "Authenticate my degree".to_string(),
                country: "ethiopia".to_string(),
                location: LocationInput {
                    region_id: Some(Uuid::new_v4()),
                    zone_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
                document: None,
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_rejects_structured_chain_for_foreign_order() {
    let service = service_order_manager(
        MockServiceOrderRepository::new(),
        MockGeographyRepository::new(),
        MockAssetStore::new(),
    );

    let result = service
        .create(
            &customer(Uuid::new_v4()),
            CreateServiceOrder {
                service_type: "Document authentication".to_string(),
                description: "Authenticate my degree".to_string(),
                country: "Kenya".to_string(),
                location: LocationInput {
                    region_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
                document: None,
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_foreign_order_with_manual_text() {
    let mut orders = MockServiceOrderRepository::new();
    orders
        .expect_create()
        .withf(|new| new.country == "Kenya" && new.location.geo_ref().region_id.is_none())
        .times(1)
        .returning(|new| {
            let mut order = foreign_order(Uuid::new_v4(), new.created_by, OrderStatus::Pending);
            order.service_type = new.service_type;
            Ok(order)
        });

    let service = service_order_manager(
        orders,
        MockGeographyRepository::new(),
        MockAssetStore::new(),
    );

    let result = service
        .create(
            &customer(Uuid::new_v4()),
            CreateServiceOrder {
                service_type: "Document authentication".to_string(),
                description: "Authenticate my degree".to_string(),
                country: "Kenya".to_string(),
                location: LocationInput {
                    manual_region: Some("Nairobi County".to_string()),
                    manual_zone: Some("Westlands".to_string()),
                    manual_woreda: Some("Parklands".to_string()),
                    ..Default::default()
                },
                document: None,
            },
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_create_stores_attached_document() {
    let mut orders = MockServiceOrderRepository::new();
    orders
        .expect_create()
        .withf(|new| new.document_url.as_deref() == Some("/uploads/degree.pdf"))
        .returning(|new| Ok(foreign_order(Uuid::new_v4(), new.created_by, OrderStatus::Pending)));

    let mut assets = MockAssetStore::new();
    assets
        .expect_store()
        .times(1)
        .returning(|_, name| Ok(format!("/uploads/{}", name)));

    let service = service_order_manager(orders, MockGeographyRepository::new(), assets);

    let result = service
        .create(
            &customer(Uuid::new_v4()),
            CreateServiceOrder {
                service_type: "Document authentication".to_string(),
                description: "Authenticate my degree".to_string(),
                country: "Kenya".to_string(),
                location: LocationInput {
                    manual_region: Some("Nairobi County".to_string()),
                    manual_zone: Some("Westlands".to_string()),
                    manual_woreda: Some("Parklands".to_string()),
                    ..Default::default()
                },
                document: Some(Upload {
                    file_name: "degree.pdf".to_string(),
                    bytes: vec![0x25, 0x50, 0x44, 0x46],
                }),
            },
        )
        .await;

    assert!(result.is_ok());
}

// =============================================================================
// Visibility and the owner window
// =============================================================================

#[tokio::test]
async fn test_foreign_order_invisible_to_geography_staff() {
    let staff = CurrentUser {
        id: Uuid::new_v4(),
        email: "staff@example.com".to_string(),
        role: Role::WoredaAdmin,
        region_id: Some(Uuid::new_v4()),
        zone_id: Some(Uuid::new_v4()),
        woreda_id: Some(Uuid::new_v4()),
    };

    let mut orders = MockServiceOrderRepository::new();
    orders
        .expect_find_by_id()
        .returning(|id| Ok(Some(foreign_order(id, Uuid::new_v4(), OrderStatus::Pending))));

    let service = service_order_manager(
        orders,
        MockGeographyRepository::new(),
        MockAssetStore::new(),
    );
    let result = service.get(&staff, Uuid::new_v4()).await;

    // Foreign orders carry no geography, so scoped staff cannot see them.
    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn test_cancel_own_closes_after_review_window() {
    let owner = customer(Uuid::new_v4());
    let owner_id = owner.id;

    let mut orders = MockServiceOrderRepository::new();
    orders
        .expect_find_by_id()
        .returning(move |id| Ok(Some(foreign_order(id, owner_id, OrderStatus::Accepted))));

    let service = service_order_manager(
        orders,
        MockGeographyRepository::new(),
        MockAssetStore::new(),
    );
    let result = service.cancel_own(&owner, Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_cancel_own_within_reviewed_window() {
    let owner = customer(Uuid::new_v4());
    let owner_id = owner.id;

    let mut orders = MockServiceOrderRepository::new();
    orders
        .expect_find_by_id()
        .returning(move |id| Ok(Some(foreign_order(id, owner_id, OrderStatus::Reviewed))));
    orders
        .expect_transition()
        .withf(|_, from, to| *from == OrderStatus::Reviewed && *to == OrderStatus::Cancelled)
        .returning(|_, _, _| Ok(true));

    let service = service_order_manager(
        orders,
        MockGeographyRepository::new(),
        MockAssetStore::new(),
    );

    assert!(service.cancel_own(&owner, Uuid::new_v4()).await.is_ok());
}

// =============================================================================
// Customer orders
// =============================================================================

#[tokio::test]
async fn test_customer_order_rejects_non_positive_quantity() {
    let service = CustomerOrderManager::new(
        Arc::new(MockCustomerOrderRepository::new()),
        Arc::new(MockUserRepository::new()),
        Arc::new(MockGeographyRepository::new()),
        Arc::new(MockAssetStore::new()),
        Arc::new(MockNotifier::new()),
    );

    let result = service
        .create(
            &customer(Uuid::new_v4()),
            CreateCustomerOrder {
                item: "Teff flour".to_string(),
                quantity: 0,
                description: "Bulk order".to_string(),
                country: "Kenya".to_string(),
                location: LocationInput::default(),
                document: None,
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_customer_order_update_rejects_non_positive_quantity() {
    let owner = customer(Uuid::new_v4());
    let owner_id = owner.id;

    let mut orders = MockCustomerOrderRepository::new();
    orders.expect_find_by_id().returning(move |id| {
        let service_shape = foreign_order(id, owner_id, OrderStatus::Pending);
        Ok(Some(hulegeb::domain::CustomerOrder {
            id: service_shape.id,
            item: "Teff flour".to_string(),
            quantity: 5,
            description: service_shape.description,
            country: service_shape.country,
            region_id: None,
            zone_id: None,
            woreda_id: None,
            manual_region: service_shape.manual_region,
            manual_zone: service_shape.manual_zone,
            manual_woreda: service_shape.manual_woreda,
            document_url: None,
            status: OrderStatus::Pending,
            created_by: owner_id,
            is_deleted: false,
            deleted_by: None,
            deleted_at: None,
            created_at: service_shape.created_at,
            updated_at: service_shape.updated_at,
        }))
    });

    let service = CustomerOrderManager::new(
        Arc::new(orders),
        Arc::new(MockUserRepository::new()),
        Arc::new(MockGeographyRepository::new()),
        Arc::new(MockAssetStore::new()),
        Arc::new(MockNotifier::new()),
    );

    let result = service
        .update_own(
            &owner,
            Uuid::new_v4(),
            hulegeb::domain::CustomerOrderPatch {
                quantity: Some(-3),
                ..Default::default()
            },
            None,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_transition_requires_review_permission() {
    let service = service_order_manager(
        MockServiceOrderRepository::new(),
        MockGeographyRepository::new(),
        MockAssetStore::new(),
    );

    let result = service
        .transition(
            &customer(Uuid::new_v4()),
            Uuid::new_v4(),
            OrderStatus::Reviewed,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}
