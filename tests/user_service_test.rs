//! User service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use hulegeb::domain::{AccountStatus, CurrentUser, Role, User};
use hulegeb::errors::AppError;
use hulegeb::infra::repositories::{
    MockGeographyRepository, MockRefreshTokenRepository, MockUserRepository, UserFilter,
};
use hulegeb::services::{UserManager, UserService};
use hulegeb::types::PaginationParams;

fn test_user(id: Uuid) -> User {
    User {
        id,
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password_hash: "hashed".to_string(),
        phone: "+251911000000".to_string(),
        role: Role::User,
        status: AccountStatus::Active,
        region_id: None,
        zone_id: None,
        woreda_id: None,
        is_deleted: false,
        deleted_by: None,
        deleted_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn caller(id: Uuid, role: Role) -> CurrentUser {
    CurrentUser {
        id,
        email: "caller@example.com".to_string(),
        role,
        region_id: None,
        zone_id: None,
        woreda_id: None,
    }
}

fn manager(
    users: MockUserRepository,
    tokens: MockRefreshTokenRepository,
    geography: MockGeographyRepository,
) -> UserManager {
    UserManager::new(Arc::new(users), Arc::new(tokens), Arc::new(geography))
}

// =============================================================================
// Own profile
// =============================================================================

#[tokio::test]
async fn test_get_profile_success() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(user_id))
        .returning(|id| Ok(Some(test_user(id))));

    let service = manager(
        users,
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let profile = service.get_profile(&caller(user_id, Role::User)).await;

    assert_eq!(profile.unwrap().id, user_id);
}

#[tokio::test]
async fn test_get_profile_refuses_blocked_account() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|id| {
        let mut user = test_user(id);
        user.status = AccountStatus::Blocked;
        Ok(Some(user))
    });

    let service = manager(
        users,
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let result = service.get_profile(&caller(user_id, Role::User)).await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_get_profile_of_banned_account_is_gone() {
    // The repository excludes soft-deleted rows, so a stale token
    // resolves to nothing.
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().returning(|_| Ok(None));

    let service = manager(
        users,
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let result = service
        .get_profile(&caller(Uuid::new_v4(), Role::User))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
}

#[tokio::test]
async fn test_update_profile_rejects_phone_of_another_account() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    users
        .expect_find_by_phone()
        .returning(|_| Ok(Some(test_user(Uuid::new_v4()))));

    let service = manager(
        users,
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let result = service
        .update_profile(
            &caller(user_id, Role::User),
            None,
            Some("+251911222333".to_string()),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_update_profile_keeps_own_phone() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .returning(|id| Ok(Some(test_user(id))));
    // The phone resolves to the caller itself, which is fine.
    users
        .expect_find_by_phone()
        .returning(move |_| Ok(Some(test_user(user_id))));
    users
        .expect_update_profile()
        .times(1)
        .returning(|id, _, _| Ok(test_user(id)));

    let service = manager(
        users,
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let result = service
        .update_profile(
            &caller(user_id, Role::User),
            Some("New Name".to_string()),
            Some("+251911000000".to_string()),
        )
        .await;

    assert!(result.is_ok());
}

// =============================================================================
// Administration
// =============================================================================

#[tokio::test]
async fn test_list_users_requires_admin() {
    let service = manager(
        MockUserRepository::new(),
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let result = service
        .list_users(
            &caller(Uuid::new_v4(), Role::WoredaAdmin),
            UserFilter::default(),
            PaginationParams::default(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_list_users_pages_results() {
    let mut users = MockUserRepository::new();
    users.expect_list().returning(|_, _| {
        Ok((
            vec![test_user(Uuid::new_v4()), test_user(Uuid::new_v4())],
            12,
        ))
    });

    let service = manager(
        users,
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let page = service
        .list_users(
            &caller(Uuid::new_v4(), Role::Admin),
            UserFilter::default(),
            PaginationParams::default(),
        )
        .await
        .unwrap();

    assert_eq!(page.data.len(), 2);
    assert_eq!(page.meta.total, 12);
}

#[tokio::test]
async fn test_assign_role_rejects_self() {
    let admin_id = Uuid::new_v4();

    let service = manager(
        MockUserRepository::new(),
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let result = service
        .assign_role(
            &caller(admin_id, Role::Admin),
            admin_id,
            Role::User,
            None,
            None,
            None,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_assign_region_admin_requires_region() {
    let service = manager(
        MockUserRepository::new(),
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let result = service
        .assign_role(
            &caller(Uuid::new_v4(), Role::Admin),
            Uuid::new_v4(),
            Role::RegionAdmin,
            None,
            None,
            None,
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_assign_role_drops_binding_below_role_level() {
    let region_id = Uuid::new_v4();
    let zone_id = Uuid::new_v4();
    let target = Uuid::new_v4();

    let mut geography = MockGeographyRepository::new();
    geography.expect_find_region().returning(|id| {
        Ok(Some(hulegeb::domain::Region {
            id,
            name: "Oromia".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }))
    });
    geography.expect_find_zone().returning(move |id| {
        Ok(Some(hulegeb::domain::Zone {
            id,
            name: "East Shewa".to_string(),
            region_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }))
    });

    let mut users = MockUserRepository::new();
    // A zone admin keeps region and zone; a woreda passed by the client
    // is discarded.
    users
        .expect_assign_role()
        .withf(move |id, role, region, zone, woreda| {
            *id == target
                && *role == Role::ZoneAdmin
                && *region == Some(region_id)
                && *zone == Some(zone_id)
                && woreda.is_none()
        })
        .times(1)
        .returning(|id, _, _, _, _| Ok(test_user(id)));

    let service = manager(
        users,
        MockRefreshTokenRepository::new(),
        geography,
    );
    let result = service
        .assign_role(
            &caller(Uuid::new_v4(), Role::Admin),
            target,
            Role::ZoneAdmin,
            Some(region_id),
            Some(zone_id),
            Some(Uuid::new_v4()),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_block_user_revokes_sessions() {
    let target = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_set_status()
        .with(eq(target), eq(AccountStatus::Blocked))
        .returning(|id, _| {
            let mut user = test_user(id);
            user.status = AccountStatus::Blocked;
            Ok(user)
        });

    let mut tokens = MockRefreshTokenRepository::new();
    tokens
        .expect_delete_for_user()
        .with(eq(target))
        .times(1)
        .returning(|_| Ok(2));

    let service = manager(users, tokens, MockGeographyRepository::new());
    let blocked = service
        .block_user(&caller(Uuid::new_v4(), Role::Admin), target)
        .await
        .unwrap();

    assert_eq!(blocked.status, AccountStatus::Blocked);
}

#[tokio::test]
async fn test_block_own_account_rejected() {
    let admin_id = Uuid::new_v4();

    let service = manager(
        MockUserRepository::new(),
        MockRefreshTokenRepository::new(),
        MockGeographyRepository::new(),
    );
    let result = service
        .block_user(&caller(admin_id, Role::Admin), admin_id)
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_delete_user_bans_and_revokes() {
    let target = Uuid::new_v4();
    let admin = caller(Uuid::new_v4(), Role::Admin);
    let admin_id = admin.id;

    let mut users = MockUserRepository::new();
    users
        .expect_soft_delete()
        .withf(move |id, by| *id == target && *by == admin_id)
        .times(1)
        .returning(|_, _| Ok(()));

    let mut tokens = MockRefreshTokenRepository::new();
    tokens.expect_delete_for_user().returning(|_| Ok(1));

    let service = manager(users, tokens, MockGeographyRepository::new());

    assert!(service.delete_user(&admin, target).await.is_ok());
}
