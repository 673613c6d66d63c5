//! Role model and authorization tables.
//!
//! The platform recognizes a fixed vocabulary of roles. They are stored
//! as strings in the database but handled as a closed enum everywhere
//! else, with one explicit table mapping roles to permitted operations
//! and one mapping admin roles to their geographic authority.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Closed set of platform roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Admin,
    RegionAdmin,
    ZoneAdmin,
    WoredaAdmin,
    Agent,
    Assistant,
    User,
    Partner,
}

/// Operations gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Manage user accounts: list, assign roles, block, ban
    ManageUsers,
    /// Create and edit the Region/Zone/Woreda hierarchy
    ManageGeography,
    /// Create, edit and close job postings
    ManageJobs,
    /// Publish and retire news items
    ManageNews,
    /// Progress citizen reports through their lifecycle
    ReviewReports,
    /// Progress service and customer orders through their lifecycle
    ReviewOrders,
    /// Progress job applications through their lifecycle
    ReviewApplications,
    /// Progress partnership requests through their lifecycle
    ReviewPartnerships,
    /// Progress agent requests through their lifecycle
    ReviewAgents,
    /// Read the statistics dashboards
    ViewStatistics,
    /// List and remove user feedback
    ModerateFeedback,
    /// Read and answer user message threads
    AnswerMessages,
}

impl Role {
    /// The role assigned to newly registered accounts.
    pub const DEFAULT: Role = Role::User;

    /// Whether this role is one of the geography-scoped admin roles.
    pub fn is_geographic_admin(&self) -> bool {
        matches!(self, Role::RegionAdmin | Role::ZoneAdmin | Role::WoredaAdmin)
    }

    /// Whether this role may perform the given operation.
    ///
    /// This table is the single authorization source; handlers never
    /// compare role strings directly.
    pub fn allows(&self, permission: Permission) -> bool {
        use Permission::*;
        match permission {
            ManageUsers | ManageGeography | ManageJobs | ManageNews | ReviewApplications
            | ReviewPartnerships | ReviewAgents | ModerateFeedback => {
                matches!(self, Role::Admin)
            }
            ReviewReports | ReviewOrders | ViewStatistics => {
                matches!(self, Role::Admin) || self.is_geographic_admin()
            }
            AnswerMessages => matches!(self, Role::Admin | Role::Assistant),
        }
    }

    /// Canonical string value as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::RegionAdmin => "regionAdmin",
            Role::ZoneAdmin => "zoneAdmin",
            Role::WoredaAdmin => "woredaAdmin",
            Role::Agent => "agent",
            Role::Assistant => "assistant",
            Role::User => "user",
            Role::Partner => "partner",
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            "regionAdmin" => Role::RegionAdmin,
            "zoneAdmin" => Role::ZoneAdmin,
            "woredaAdmin" => Role::WoredaAdmin,
            "agent" => Role::Agent,
            "assistant" => Role::Assistant,
            "partner" => Role::Partner,
            // Unknown strings degrade to the least privileged role
            _ => Role::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geographic reference carried by lifecycle entities.
///
/// All fields optional: orders outside the covered country carry none,
/// region-level entities may carry only the upper parts of the chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRef {
    pub region_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub woreda_id: Option<Uuid>,
}

impl GeoRef {
    pub fn new(region_id: Option<Uuid>, zone_id: Option<Uuid>, woreda_id: Option<Uuid>) -> Self {
        Self {
            region_id,
            zone_id,
            woreda_id,
        }
    }

    /// True when no structured geography is attached.
    pub fn is_empty(&self) -> bool {
        self.region_id.is_none() && self.zone_id.is_none() && self.woreda_id.is_none()
    }
}

/// The slice of the world a caller is allowed to see and act on.
///
/// Role-scoped listing and staff transitions both go through this type:
/// it becomes a hidden WHERE-predicate on queries and a containment
/// check before any status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorityScope {
    /// Super admin: everything
    All,
    /// Region admin bound to one region
    Region(Uuid),
    /// Zone admin bound to one zone
    Zone(Uuid),
    /// Woreda admin bound to one woreda
    Woreda(Uuid),
    /// Ordinary account: only rows it created
    Own(Uuid),
}

impl AuthorityScope {
    /// Derive the scope for a caller.
    ///
    /// A geography admin whose geography column is missing (stale data)
    /// degrades to owner scope rather than gaining broad visibility.
    pub fn for_user(
        role: Role,
        user_id: Uuid,
        region_id: Option<Uuid>,
        zone_id: Option<Uuid>,
        woreda_id: Option<Uuid>,
    ) -> Self {
        match role {
            Role::Admin => AuthorityScope::All,
            Role::RegionAdmin => region_id
                .map(AuthorityScope::Region)
                .unwrap_or(AuthorityScope::Own(user_id)),
            Role::ZoneAdmin => zone_id
                .map(AuthorityScope::Zone)
                .unwrap_or(AuthorityScope::Own(user_id)),
            Role::WoredaAdmin => woreda_id
                .map(AuthorityScope::Woreda)
                .unwrap_or(AuthorityScope::Own(user_id)),
            Role::Agent | Role::Assistant | Role::User | Role::Partner => {
                AuthorityScope::Own(user_id)
            }
        }
    }

    /// Whether an entity located at `geo` falls inside this scope.
    ///
    /// Owner scopes never contain anything here: ownership is checked
    /// against `created_by`, not geography.
    pub fn contains(&self, geo: &GeoRef) -> bool {
        match self {
            AuthorityScope::All => true,
            AuthorityScope::Region(id) => geo.region_id == Some(*id),
            AuthorityScope::Zone(id) => geo.zone_id == Some(*id),
            AuthorityScope::Woreda(id) => geo.woreda_id == Some(*id),
            AuthorityScope::Own(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [
            Role::Admin,
            Role::RegionAdmin,
            Role::ZoneAdmin,
            Role::WoredaAdmin,
            Role::Agent,
            Role::Assistant,
            Role::User,
            Role::Partner,
        ] {
            assert_eq!(Role::from(role.as_str()), role);
        }
    }

    #[test]
    fn unknown_role_string_degrades_to_user() {
        assert_eq!(Role::from("superuser"), Role::User);
        assert_eq!(Role::from(""), Role::User);
    }

    #[test]
    fn only_admin_manages_users() {
        assert!(Role::Admin.allows(Permission::ManageUsers));
        for role in [
            Role::RegionAdmin,
            Role::ZoneAdmin,
            Role::WoredaAdmin,
            Role::Agent,
            Role::Assistant,
            Role::User,
            Role::Partner,
        ] {
            assert!(!role.allows(Permission::ManageUsers), "{role} must not manage users");
        }
    }

    #[test]
    fn geographic_admins_review_reports_and_orders() {
        for role in [Role::RegionAdmin, Role::ZoneAdmin, Role::WoredaAdmin] {
            assert!(role.allows(Permission::ReviewReports));
            assert!(role.allows(Permission::ReviewOrders));
            assert!(!role.allows(Permission::ReviewAgents));
        }
    }

    #[test]
    fn assistant_answers_messages_but_user_does_not() {
        assert!(Role::Assistant.allows(Permission::AnswerMessages));
        assert!(!Role::User.allows(Permission::AnswerMessages));
    }

    #[test]
    fn zone_scope_contains_only_matching_zone() {
        let zone = Uuid::new_v4();
        let other = Uuid::new_v4();
        let scope = AuthorityScope::Zone(zone);

        assert!(scope.contains(&GeoRef::new(None, Some(zone), None)));
        assert!(!scope.contains(&GeoRef::new(None, Some(other), None)));
        assert!(!scope.contains(&GeoRef::default()));
    }

    #[test]
    fn geography_admin_without_binding_degrades_to_own() {
        let user_id = Uuid::new_v4();
        let scope = AuthorityScope::for_user(Role::ZoneAdmin, user_id, None, None, None);
        assert_eq!(scope, AuthorityScope::Own(user_id));
    }
}
