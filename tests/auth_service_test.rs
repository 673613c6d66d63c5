//! Authentication service unit tests.
//!
//! The registration protocol keeps accounts out of the database until
//! the OTP is confirmed, so these tests drive the service against
//! mocked stores and assert which side effects fire in each branch.

use std::sync::Arc;

use chrono::{Duration, Utc};
use mockall::predicate::eq;
use uuid::Uuid;

use hulegeb::config::Config;
use hulegeb::domain::{AccountStatus, Password, Role, User};
use hulegeb::errors::AppError;
use hulegeb::infra::repositories::{
    MockRefreshTokenRepository, MockUserRepository, RefreshTokenRecord,
};
use hulegeb::infra::MockTransientStore;
use hulegeb::jobs::MockNotifier;
use hulegeb::services::{AuthService, Authenticator};
use hulegeb::utils::EmailTemplate;

const GOOD_PASSWORD: &str = "correct-horse-battery";

fn test_user(id: Uuid, password: &str) -> User {
    User {
        id,
        name: "Abebe Kebede".to_string(),
        email: "abebe@example.com".to_string(),
        password_hash: Password::new(password).unwrap().into_string(),
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

/// A notifier that accepts anything; most tests do not care about mail.
fn quiet_notifier() -> MockNotifier {
    let mut notifier = MockNotifier::new();
    notifier.expect_notify().returning(|_, _| Ok(()));
    notifier
}

fn authenticator(
    users: MockUserRepository,
    tokens: MockRefreshTokenRepository,
    transient: MockTransientStore,
    notifier: MockNotifier,
) -> Authenticator {
    Authenticator::new(
        Arc::new(users),
        Arc::new(tokens),
        Arc::new(transient),
        Arc::new(notifier),
        Config::for_tests(),
    )
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_stages_otp_and_sends_code() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email_any().returning(|_| Ok(None));
    users.expect_find_by_phone().returning(|_| Ok(None));

    let mut transient = MockTransientStore::new();
    transient
        .expect_stage_registration()
        .withf(|email, code, pending| {
            email == "abebe@example.com"
                && code.len() == 6
                && code.chars().all(|c| c.is_ascii_digit())
                && pending.password_hash != "plain-secret-123"
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut notifier = MockNotifier::new();
    notifier
        .expect_notify()
        .withf(|recipient, template| {
            recipient == "abebe@example.com"
                && matches!(template, EmailTemplate::OtpCode { .. })
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let service = authenticator(users, MockRefreshTokenRepository::new(), transient, notifier);
    let result = service
        .register(
            "Abebe Kebede".to_string(),
            "abebe@example.com".to_string(),
            "plain-secret-123".to_string(),
            "+251911000000".to_string(),
        )
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_register_rejects_taken_email() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_any()
        .returning(|_| Ok(Some(test_user(Uuid::new_v4(), GOOD_PASSWORD))));

    let service = authenticator(
        users,
        MockRefreshTokenRepository::new(),
        MockTransientStore::new(),
        MockNotifier::new(),
    );
    let result = service
        .register(
            "Someone".to_string(),
            "abebe@example.com".to_string(),
            "plain-secret-123".to_string(),
            "+251911999999".to_string(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_register_refuses_banned_email() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email_any().returning(|_| {
        let mut banned = test_user(Uuid::new_v4(), GOOD_PASSWORD);
        banned.is_deleted = true;
        Ok(Some(banned))
    });

    let service = authenticator(
        users,
        MockRefreshTokenRepository::new(),
        MockTransientStore::new(),
        MockNotifier::new(),
    );
    let result = service
        .register(
            "Someone".to_string(),
            "abebe@example.com".to_string(),
            "plain-secret-123".to_string(),
            "+251911999999".to_string(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_register_rejects_taken_phone() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email_any().returning(|_| Ok(None));
    users
        .expect_find_by_phone()
        .with(eq("+251911000000"))
        .returning(|_| Ok(Some(test_user(Uuid::new_v4(), GOOD_PASSWORD))));

    let service = authenticator(
        users,
        MockRefreshTokenRepository::new(),
        MockTransientStore::new(),
        MockNotifier::new(),
    );
    let result = service
        .register(
            "Someone".to_string(),
            "fresh@example.com".to_string(),
            "plain-secret-123".to_string(),
            "+251911000000".to_string(),
        )
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

// =============================================================================
// OTP verification
// =============================================================================

#[tokio::test]
async fn test_verify_otp_creates_account() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_phone().returning(|_| Ok(None));
    users
        .expect_create()
        .withf(|pending| pending.email == "abebe@example.com")
        .times(1)
        .returning(|pending| {
            let mut user = test_user(Uuid::new_v4(), GOOD_PASSWORD);
            user.email = pending.email;
            user.name = pending.name;
            Ok(user)
        });

    let mut transient = MockTransientStore::new();
    transient
        .expect_fetch_otp()
        .returning(|_| Ok(Some("483921".to_string())));
    transient
        .expect_invalidate_otp()
        .times(1)
        .returning(|_| Ok(()));
    transient.expect_fetch_pending_registration().returning(|_| {
        Ok(Some(hulegeb::domain::PendingRegistration {
            name: "Abebe Kebede".to_string(),
            email: "abebe@example.com".to_string(),
            password_hash: "$argon2id$staged".to_string(),
            phone: "+251911000000".to_string(),
        }))
    });
    transient
        .expect_clear_registration()
        .times(1)
        .returning(|_| Ok(()));

    let service = authenticator(
        users,
        MockRefreshTokenRepository::new(),
        transient,
        quiet_notifier(),
    );
    let user = service
        .verify_otp("abebe@example.com", "483921")
        .await
        .unwrap();

    assert_eq!(user.email, "abebe@example.com");
}

#[tokio::test]
async fn test_verify_otp_wrong_code_counts_attempt() {
    let mut transient = MockTransientStore::new();
    transient
        .expect_fetch_otp()
        .returning(|_| Ok(Some("483921".to_string())));
    transient
        .expect_record_otp_attempt()
        .times(1)
        .returning(|_| Ok(1));

    let service = authenticator(
        MockUserRepository::new(),
        MockRefreshTokenRepository::new(),
        transient,
        MockNotifier::new(),
    );
    let result = service.verify_otp("abebe@example.com", "000000").await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidOtp));
}

#[tokio::test]
async fn test_verify_otp_attempt_limit_burns_code() {
    let mut transient = MockTransientStore::new();
    transient
        .expect_fetch_otp()
        .returning(|_| Ok(Some("483921".to_string())));
    transient.expect_record_otp_attempt().returning(|_| Ok(5));
    // The fifth miss invalidates the code while the payload survives.
    transient
        .expect_invalidate_otp()
        .times(1)
        .returning(|_| Ok(()));

    let service = authenticator(
        MockUserRepository::new(),
        MockRefreshTokenRepository::new(),
        transient,
        MockNotifier::new(),
    );
    let result = service.verify_otp("abebe@example.com", "000000").await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidOtp));
}

#[tokio::test]
async fn test_verify_otp_without_staged_code_reports_expired() {
    let mut transient = MockTransientStore::new();
    transient.expect_fetch_otp().returning(|_| Ok(None));

    let service = authenticator(
        MockUserRepository::new(),
        MockRefreshTokenRepository::new(),
        transient,
        MockNotifier::new(),
    );
    let result = service.verify_otp("abebe@example.com", "483921").await;

    assert!(matches!(result.unwrap_err(), AppError::Expired(_)));
}

#[tokio::test]
async fn test_verify_otp_phone_claimed_while_pending() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_phone()
        .returning(|_| Ok(Some(test_user(Uuid::new_v4(), GOOD_PASSWORD))));

    let mut transient = MockTransientStore::new();
    transient
        .expect_fetch_otp()
        .returning(|_| Ok(Some("483921".to_string())));
    transient.expect_invalidate_otp().returning(|_| Ok(()));
    transient.expect_fetch_pending_registration().returning(|_| {
        Ok(Some(hulegeb::domain::PendingRegistration {
            name: "Abebe Kebede".to_string(),
            email: "abebe@example.com".to_string(),
            password_hash: "$argon2id$staged".to_string(),
            phone: "+251911000000".to_string(),
        }))
    });
    transient
        .expect_clear_registration()
        .times(1)
        .returning(|_| Ok(()));

    let service = authenticator(
        users,
        MockRefreshTokenRepository::new(),
        transient,
        MockNotifier::new(),
    );
    let result = service.verify_otp("abebe@example.com", "483921").await;

    assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
}

// =============================================================================
// Login and sessions
// =============================================================================

#[tokio::test]
async fn test_login_issues_access_and_refresh_tokens() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_any()
        .returning(move |_| Ok(Some(test_user(user_id, GOOD_PASSWORD))));

    let mut tokens = MockRefreshTokenRepository::new();
    tokens
        .expect_insert()
        .withf(move |_, uid, expires_at| *uid == user_id && *expires_at > Utc::now())
        .times(1)
        .returning(|_, _, _| Ok(()));

    let service = authenticator(users, tokens, MockTransientStore::new(), MockNotifier::new());
    let response = service
        .login("abebe@example.com", GOOD_PASSWORD)
        .await
        .unwrap();

    assert!(!response.access_token.is_empty());
    assert!(response.refresh_token.is_some());
    assert_eq!(response.token_type, "Bearer");
    assert_eq!(response.expires_in, 24 * 3600);
}

#[tokio::test]
async fn test_login_unknown_email() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email_any().returning(|_| Ok(None));

    let service = authenticator(
        users,
        MockRefreshTokenRepository::new(),
        MockTransientStore::new(),
        MockNotifier::new(),
    );
    let result = service.login("ghost@example.com", GOOD_PASSWORD).await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_any()
        .returning(|_| Ok(Some(test_user(Uuid::new_v4(), GOOD_PASSWORD))));

    let service = authenticator(
        users,
        MockRefreshTokenRepository::new(),
        MockTransientStore::new(),
        MockNotifier::new(),
    );
    let result = service.login("abebe@example.com", "not-the-password").await;

    assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_login_blocked_account() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email_any().returning(|_| {
        let mut blocked = test_user(Uuid::new_v4(), GOOD_PASSWORD);
        blocked.status = AccountStatus::Blocked;
        Ok(Some(blocked))
    });

    let service = authenticator(
        users,
        MockRefreshTokenRepository::new(),
        MockTransientStore::new(),
        MockNotifier::new(),
    );
    let result = service.login("abebe@example.com", GOOD_PASSWORD).await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden(_)));
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let user_id = Uuid::new_v4();
    let token = Uuid::new_v4();

    let mut tokens = MockRefreshTokenRepository::new();
    tokens.expect_find().with(eq(token)).returning(move |t| {
        Ok(Some(RefreshTokenRecord {
            token: t,
            user_id,
            expires_at: Utc::now() + Duration::days(10),
        }))
    });

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .with(eq(user_id))
        .returning(move |id| Ok(Some(test_user(id, GOOD_PASSWORD))));

    let service = authenticator(users, tokens, MockTransientStore::new(), MockNotifier::new());
    let response = service.refresh(token).await.unwrap();

    assert!(!response.access_token.is_empty());
    // Refresh tokens are not rotated.
    assert!(response.refresh_token.is_none());
}

#[tokio::test]
async fn test_refresh_rejects_expired_token() {
    let token = Uuid::new_v4();

    let mut tokens = MockRefreshTokenRepository::new();
    tokens.expect_find().returning(move |t| {
        Ok(Some(RefreshTokenRecord {
            token: t,
            user_id: Uuid::new_v4(),
            expires_at: Utc::now() - Duration::hours(1),
        }))
    });
    tokens
        .expect_delete()
        .with(eq(token))
        .times(1)
        .returning(|_| Ok(true));

    let service = authenticator(
        MockUserRepository::new(),
        tokens,
        MockTransientStore::new(),
        MockNotifier::new(),
    );
    let result = service.refresh(token).await;

    assert!(matches!(result.unwrap_err(), AppError::Unauthenticated));
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let mut tokens = MockRefreshTokenRepository::new();
    tokens.expect_delete().returning(|_| Ok(false));

    let service = authenticator(
        MockUserRepository::new(),
        tokens,
        MockTransientStore::new(),
        MockNotifier::new(),
    );

    assert!(service.logout(Uuid::new_v4()).await.is_ok());
}

#[tokio::test]
async fn test_access_token_round_trips_claims() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email_any()
        .returning(move |_| Ok(Some(test_user(user_id, GOOD_PASSWORD))));

    let mut tokens = MockRefreshTokenRepository::new();
    tokens.expect_insert().returning(|_, _, _| Ok(()));

    let service = authenticator(users, tokens, MockTransientStore::new(), MockNotifier::new());
    let response = service
        .login("abebe@example.com", GOOD_PASSWORD)
        .await
        .unwrap();

    let claims = service.verify_token(&response.access_token).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, Role::User);
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn test_verify_token_rejects_garbage() {
    let service = authenticator(
        MockUserRepository::new(),
        MockRefreshTokenRepository::new(),
        MockTransientStore::new(),
        MockNotifier::new(),
    );

    assert!(service.verify_token("not-a-jwt").is_err());
}
