//! Report service unit tests.
//!
//! Covers the visibility rule (owner or in-scope staff, everything else
//! reads as not-found), the owner edit window, and the compare-and-set
//! status transitions under concurrent reviewers.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use hulegeb::domain::{CurrentUser, Report, ReportStatus, Role};
use hulegeb::errors::AppError;
use hulegeb::infra::repositories::{
    MockGeographyRepository, MockReportRepository, MockUserRepository,
};
use hulegeb::infra::MockAssetStore;
use hulegeb::jobs::MockNotifier;
use hulegeb::services::{CreateReport, ReportManager, ReportService};

fn citizen(id: Uuid) -> CurrentUser {
    CurrentUser {
        id,
        email: "citizen@example.com".to_string(),
        role: Role::User,
        region_id: None,
        zone_id: None,
        woreda_id: None,
    }
}

fn woreda_admin(woreda_id: Uuid) -> CurrentUser {
    CurrentUser {
        id: Uuid::new_v4(),
        email: "admin@example.com".to_string(),
        role: Role::WoredaAdmin,
        region_id: Some(Uuid::new_v4()),
        zone_id: Some(Uuid::new_v4()),
        woreda_id: Some(woreda_id),
    }
}

fn test_report(id: Uuid, created_by: Uuid, woreda_id: Uuid, status: ReportStatus) -> Report {
    Report {
        id,
        title: "Broken water pipe".to_string(),
        description: "The main line on the market road is leaking.".to_string(),
        region_id: Uuid::new_v4(),
        zone_id: Uuid::new_v4(),
        woreda_id,
        image_url: None,
        video_url: None,
        status,
        created_by,
        is_deleted: false,
        deleted_by: None,
        deleted_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

struct Mocks {
    reports: MockReportRepository,
    users: MockUserRepository,
    geography: MockGeographyRepository,
    assets: MockAssetStore,
    notifier: MockNotifier,
}

impl Mocks {
    fn new() -> Self {
        Self {
            reports: MockReportRepository::new(),
            users: MockUserRepository::new(),
            geography: MockGeographyRepository::new(),
            assets: MockAssetStore::new(),
            notifier: MockNotifier::new(),
        }
    }

    fn into_service(self) -> ReportManager {
        ReportManager::new(
            Arc::new(self.reports),
            Arc::new(self.users),
            Arc::new(self.geography),
            Arc::new(self.assets),
            Arc::new(self.notifier),
        )
    }
}

#[tokio::test]
async fn test_create_rejects_broken_geography_chain() {
    let mut mocks = Mocks::new();
    // The region lookup fails, so nothing past validation may run.
    mocks
        .geography
        .expect_find_region()
        .returning(|_| Ok(None));

    let service = mocks.into_service();
    let result = service
        .create(
            &citizen(Uuid::new_v4()),
            CreateReport {
                title: "Broken water pipe".to_string(),
                description: "Leaking".to_string(),
                region_id: Uuid::new_v4(),
                zone_id: Uuid::new_v4(),
                woreda_id: Uuid::new_v4(),
                image: None,
                video: None,
            },
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_get_hides_foreign_report_as_not_found() {
    let report_id = Uuid::new_v4();

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            ReportStatus::Pending,
        )))
    });

    let service = mocks.into_service();
    let result = service.get(&citizen(Uuid::new_v4()), report_id).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn test_get_allows_owner() {
    let owner = citizen(Uuid::new_v4());
    let owner_id = owner.id;
    let report_id = Uuid::new_v4();

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            owner_id,
            Uuid::new_v4(),
            ReportStatus::Pending,
        )))
    });

    let service = mocks.into_service();
    let report = service.get(&owner, report_id).await.unwrap();

    assert_eq!(report.id, report_id);
}

#[tokio::test]
async fn test_get_allows_staff_in_scope() {
    let woreda_id = Uuid::new_v4();
    let staff = woreda_admin(woreda_id);
    let report_id = Uuid::new_v4();

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            Uuid::new_v4(),
            woreda_id,
            ReportStatus::Open,
        )))
    });

    let service = mocks.into_service();

    assert!(service.get(&staff, report_id).await.is_ok());
}

#[tokio::test]
async fn test_update_own_rejects_non_owner() {
    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            ReportStatus::Pending,
        )))
    });

    let service = mocks.into_service();
    let result = service
        .update_own(
            &citizen(Uuid::new_v4()),
            Uuid::new_v4(),
            Default::default(),
            None,
            None,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_update_own_closes_after_pending() {
    let owner = citizen(Uuid::new_v4());
    let owner_id = owner.id;

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            owner_id,
            Uuid::new_v4(),
            ReportStatus::InProgress,
        )))
    });

    let service = mocks.into_service();
    let result = service
        .update_own(&owner, Uuid::new_v4(), Default::default(), None, None)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_update_own_stores_replacement_image() {
    let owner = citizen(Uuid::new_v4());
    let owner_id = owner.id;
    let report_id = Uuid::new_v4();

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            owner_id,
            Uuid::new_v4(),
            ReportStatus::Pending,
        )))
    });
    mocks
        .assets
        .expect_store()
        .times(1)
        .returning(|_, name| Ok(format!("/uploads/{}", name)));
    mocks
        .reports
        .expect_update()
        .withf(|_, patch| patch.image_url.as_deref() == Some("/uploads/pipe.jpg"))
        .returning(move |id, _| {
            Ok(test_report(id, owner_id, Uuid::new_v4(), ReportStatus::Pending))
        });

    let service = mocks.into_service();
    let result = service
        .update_own(
            &owner,
            report_id,
            Default::default(),
            Some(hulegeb::domain::Upload {
                file_name: "pipe.jpg".to_string(),
                bytes: vec![0xFF, 0xD8],
            }),
            None,
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_cancel_own_loses_race_to_reviewer() {
    let owner = citizen(Uuid::new_v4());
    let owner_id = owner.id;

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            owner_id,
            Uuid::new_v4(),
            ReportStatus::Pending,
        )))
    });
    // The conditional update misses: a reviewer moved the row first.
    mocks
        .reports
        .expect_transition()
        .with(
            mockall::predicate::always(),
            eq(ReportStatus::Pending),
            eq(ReportStatus::Cancelled),
        )
        .returning(|_, _, _| Ok(false));

    let service = mocks.into_service();
    let result = service.cancel_own(&owner, Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_transition_requires_review_permission() {
    let service = Mocks::new().into_service();
    let result = service
        .transition(&citizen(Uuid::new_v4()), Uuid::new_v4(), ReportStatus::Open)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_transition_rejects_out_of_scope_report() {
    let staff = woreda_admin(Uuid::new_v4());

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            ReportStatus::Pending,
        )))
    });

    let service = mocks.into_service();
    let result = service
        .transition(&staff, Uuid::new_v4(), ReportStatus::Open)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_transition_rejects_illegal_jump() {
    let woreda_id = Uuid::new_v4();
    let staff = woreda_admin(woreda_id);

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            Uuid::new_v4(),
            woreda_id,
            ReportStatus::Resolved,
        )))
    });

    let service = mocks.into_service();
    let result = service
        .transition(&staff, Uuid::new_v4(), ReportStatus::Pending)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_transition_notifies_owner_on_resolution() {
    let woreda_id = Uuid::new_v4();
    let staff = woreda_admin(woreda_id);
    let owner_id = Uuid::new_v4();

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            owner_id,
            woreda_id,
            ReportStatus::InProgress,
        )))
    });
    mocks.reports.expect_transition().returning(|_, _, _| Ok(true));
    mocks.users.expect_find_by_id().returning(move |id| {
        Ok(Some(hulegeb::domain::User {
            id,
            name: "Owner".to_string(),
            email: "owner@example.com".to_string(),
            password_hash: "hash".to_string(),
            phone: "+251911".to_string(),
            role: Role::User,
            status: hulegeb::domain::AccountStatus::Active,
            region_id: None,
            zone_id: None,
            woreda_id: None,
            is_deleted: false,
            deleted_by: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }))
    });
    mocks
        .notifier
        .expect_notify()
        .with(eq("owner@example.com"), mockall::predicate::always())
        .times(1)
        .returning(|_, _| Ok(()));

    let service = mocks.into_service();
    let result = service
        .transition(&staff, Uuid::new_v4(), ReportStatus::Resolved)
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_requires_scope() {
    let staff = woreda_admin(Uuid::new_v4());

    let mut mocks = Mocks::new();
    mocks.reports.expect_find_by_id().returning(move |id| {
        Ok(Some(test_report(
            id,
            Uuid::new_v4(),
            Uuid::new_v4(),
            ReportStatus::Open,
        )))
    });

    let service = mocks.into_service();
    let result = service.delete(&staff, Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}
