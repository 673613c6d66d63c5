//! API boundary tests.
//!
//! Exercise the response envelope, the error-to-status mapping and the
//! serialization rules without requiring database or Redis connections.

use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use hulegeb::domain::{AccountStatus, Report, ReportStatus, Role, User, UserResponse};
use hulegeb::errors::AppError;
use hulegeb::types::{ApiResponse, Created};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Response envelope
// =============================================================================

#[tokio::test]
async fn test_api_response_success_shape() {
    let response = ApiResponse::success("data").into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "data");
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn test_api_response_message_only_shape() {
    let response = ApiResponse::message("Logged out").into_response();
    let body = body_json(response).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Logged out");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_api_response_with_message_carries_both() {
    let response = ApiResponse::with_message(7, "Seven").into_response();
    let body = body_json(response).await;

    assert_eq!(body["data"], 7);
    assert_eq!(body["message"], "Seven");
}

#[tokio::test]
async fn test_created_wrapper_returns_201_with_raw_body() {
    let response = Created(serde_json::json!({"id": 1})).into_response();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    // The resource itself, not wrapped in an envelope.
    assert_eq!(body["id"], 1);
    assert!(body.get("success").is_none());
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn test_error_status_codes() {
    let cases = [
        (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
        (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
        (AppError::forbidden("no"), StatusCode::FORBIDDEN),
        (AppError::not_found("Report"), StatusCode::NOT_FOUND),
        (AppError::conflict("Email"), StatusCode::CONFLICT),
        (
            AppError::invalid_transition(ReportStatus::Resolved, ReportStatus::Pending),
            StatusCode::CONFLICT,
        ),
        (AppError::validation("bad"), StatusCode::BAD_REQUEST),
        (AppError::expired("OTP code"), StatusCode::BAD_REQUEST),
        (AppError::InvalidOtp, StatusCode::BAD_REQUEST),
        (
            AppError::internal("boom"),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.into_response().status(), expected);
    }
}

#[tokio::test]
async fn test_error_envelope_shape() {
    let body = body_json(AppError::not_found("Report").into_response()).await;

    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Report not found");
}

#[tokio::test]
async fn test_internal_error_details_are_hidden() {
    let body = body_json(AppError::internal("connection pool exhausted").into_response()).await;

    let message = body["message"].as_str().unwrap();
    assert!(!message.contains("connection pool"));
}

// =============================================================================
// Serialization rules
// =============================================================================

fn sample_user() -> User {
    User {
        id: Uuid::new_v4(),
        name: "Abebe Kebede".to_string(),
        email: "abebe@example.com".to_string(),
        password_hash: "$argon2id$secret".to_string(),
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

#[tokio::test]
async fn test_user_serialization_never_leaks_password_hash() {
    let user = serde_json::to_value(sample_user()).unwrap();
    assert!(user.get("password_hash").is_none());

    let response = serde_json::to_value(UserResponse::from(sample_user())).unwrap();
    assert!(response.get("password_hash").is_none());
    assert_eq!(response["email"], "abebe@example.com");
}

#[tokio::test]
async fn test_report_serialization_hides_soft_delete_columns() {
    let report = Report {
        id: Uuid::new_v4(),
        title: "Broken water pipe".to_string(),
        description: "Leaking".to_string(),
        region_id: Uuid::new_v4(),
        zone_id: Uuid::new_v4(),
        woreda_id: Uuid::new_v4(),
        image_url: None,
        video_url: None,
        status: ReportStatus::Pending,
        created_by: Uuid::new_v4(),
        is_deleted: false,
        deleted_by: None,
        deleted_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let value = serde_json::to_value(report).unwrap();
    assert!(value.get("is_deleted").is_none());
    assert!(value.get("deleted_by").is_none());
    // Empty attachments are omitted rather than serialized as null.
    assert!(value.get("image_url").is_none());
    assert_eq!(value["status"], "pending");
}
