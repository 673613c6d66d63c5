//! User accounts.
//!
//! Accounts only come into existence after OTP verification; until then
//! a [`PendingRegistration`] lives in the transient store keyed by
//! email. Deletion is a soft flag, and blocking is reversible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::role::{AuthorityScope, Permission, Role};

/// Whether an account may authenticate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Blocked,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Blocked => "blocked",
        }
    }
}

impl From<&str> for AccountStatus {
    fn from(s: &str) -> Self {
        match s {
            "blocked" => AccountStatus::Blocked,
            _ => AccountStatus::Active,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: String,
    pub role: Role,
    pub status: AccountStatus,
    /// Geography binding for regionAdmin/zoneAdmin/woredaAdmin roles.
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_by: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_blocked(&self) -> bool {
        self.status == AccountStatus::Blocked
    }
}

/// Caller identity resolved from JWT claims by the auth middleware.
///
/// Carries everything the service layer needs for authorization, so an
/// ordinary request never loads the user row.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
}

impl CurrentUser {
    /// The slice of the world this caller queries and transitions in.
    pub fn scope(&self) -> AuthorityScope {
        AuthorityScope::for_user(
            self.role,
            self.id,
            self.region_id,
            self.zone_id,
            self.woreda_id,
        )
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.role.allows(permission)
    }
}

/// Registration data parked in the transient store until the emailed
/// OTP is verified. The password is already hashed at this point; the
/// plain text never enters any store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
}

/// User shape returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Display name
    #[schema(example = "Abebe Kebede")]
    pub name: String,
    /// Email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Phone number
    #[schema(example = "+251911234567")]
    pub phone: String,
    /// Platform role
    pub role: Role,
    /// Account status
    pub status: AccountStatus,
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            status: user.status,
            region_id: user.region_id,
            zone_id: user.zone_id,
            woreda_id: user.woreda_id,
            created_at: user.created_at,
        }
    }
}
