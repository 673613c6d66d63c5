//! User service: own profile plus account administration.
//!
//! Administration covers listing, role assignment with geography
//! binding, reversible blocking and the soft-delete ("ban"). Blocking
//! and banning both revoke every refresh token of the target account.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AccountStatus, CurrentUser, Permission, Role, User};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{
    GeographyRepository, RefreshTokenRepository, UserFilter, UserRepository,
};
use crate::types::{Paginated, PaginationParams};

use super::geography_service::validate_chain;

/// Profile and account administration operations.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Load the caller's own profile.
    ///
    /// A deleted account resolves to nothing and a blocked one is
    /// refused, so stale tokens die here.
    async fn get_profile(&self, current: &CurrentUser) -> AppResult<User>;

    /// Update the caller's own name and phone.
    async fn update_profile(
        &self,
        current: &CurrentUser,
        name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<User>;

    /// Admin: fetch one account.
    async fn get_user(&self, actor: &CurrentUser, id: Uuid) -> AppResult<User>;

    /// Admin: list accounts with role/status/search filters.
    async fn list_users(
        &self,
        actor: &CurrentUser,
        filter: UserFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<User>>;

    /// Admin: replace an account's role and geography binding.
    async fn assign_role(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        role: Role,
        region_id: Option<Uuid>,
        zone_id: Option<Uuid>,
        woreda_id: Option<Uuid>,
    ) -> AppResult<User>;

    /// Admin: block an account and revoke its sessions. Reversible.
    async fn block_user(&self, actor: &CurrentUser, id: Uuid) -> AppResult<User>;

    /// Admin: lift a block.
    async fn unblock_user(&self, actor: &CurrentUser, id: Uuid) -> AppResult<User>;

    /// Admin: soft-delete ("ban") an account and revoke its sessions.
    async fn delete_user(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of [`UserService`].
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn RefreshTokenRepository>,
    geography: Arc<dyn GeographyRepository>,
}

impl UserManager {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn RefreshTokenRepository>,
        geography: Arc<dyn GeographyRepository>,
    ) -> Self {
        Self {
            users,
            tokens,
            geography,
        }
    }
}

fn require_manage(actor: &CurrentUser) -> AppResult<()> {
    if !actor.allows(Permission::ManageUsers) {
        return Err(AppError::forbidden(
            "Only administrators may manage accounts",
        ));
    }
    Ok(())
}

/// Binding rules per role: geography admins carry exactly the chain
/// levels their role needs, agents may carry an operating area, every
/// other role carries none.
fn binding_for(
    role: Role,
    region_id: Option<Uuid>,
    zone_id: Option<Uuid>,
    woreda_id: Option<Uuid>,
) -> AppResult<(Option<Uuid>, Option<Uuid>, Option<Uuid>)> {
    match role {
        Role::RegionAdmin => match region_id {
            Some(region) => Ok((Some(region), None, None)),
            None => Err(AppError::validation("A region admin requires a region")),
        },
        Role::ZoneAdmin => match (region_id, zone_id) {
            (Some(region), Some(zone)) => Ok((Some(region), Some(zone), None)),
            _ => Err(AppError::validation(
                "A zone admin requires a region and a zone",
            )),
        },
        Role::WoredaAdmin => match (region_id, zone_id, woreda_id) {
            (Some(region), Some(zone), Some(woreda)) => {
                Ok((Some(region), Some(zone), Some(woreda)))
            }
            _ => Err(AppError::validation(
                "A woreda admin requires the full region/zone/woreda chain",
            )),
        },
        Role::Agent => Ok((region_id, zone_id, woreda_id)),
        Role::Admin | Role::Assistant | Role::User | Role::Partner => Ok((None, None, None)),
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_profile(&self, current: &CurrentUser) -> AppResult<User> {
        let user = self
            .users
            .find_by_id(current.id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if user.is_blocked() {
            return Err(AppError::forbidden("This account is blocked"));
        }

        Ok(user)
    }

    async fn update_profile(
        &self,
        current: &CurrentUser,
        name: Option<String>,
        phone: Option<String>,
    ) -> AppResult<User> {
        // Same gate as get_profile: a blocked or deleted caller cannot
        // keep editing through a still-valid access token.
        self.get_profile(current).await?;

        if let Some(phone) = &phone {
            if let Some(other) = self.users.find_by_phone(phone).await? {
                if other.id != current.id {
                    return Err(AppError::conflict("Phone number"));
                }
            }
        }

        self.users.update_profile(current.id, name, phone).await
    }

    async fn get_user(&self, actor: &CurrentUser, id: Uuid) -> AppResult<User> {
        require_manage(actor)?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    async fn list_users(
        &self,
        actor: &CurrentUser,
        filter: UserFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<User>> {
        require_manage(actor)?;
        let (users, total) = self.users.list(filter, &params).await?;
        Ok(Paginated::new(users, params.page, params.limit(), total))
    }

    async fn assign_role(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        role: Role,
        region_id: Option<Uuid>,
        zone_id: Option<Uuid>,
        woreda_id: Option<Uuid>,
    ) -> AppResult<User> {
        require_manage(actor)?;

        if actor.id == id {
            return Err(AppError::validation("You cannot change your own role"));
        }

        let (region_id, zone_id, woreda_id) = binding_for(role, region_id, zone_id, woreda_id)?;
        validate_chain(self.geography.as_ref(), region_id, zone_id, woreda_id).await?;

        let user = self
            .users
            .assign_role(id, role, region_id, zone_id, woreda_id)
            .await?;

        tracing::info!(user_id = %id, role = %role, "Role assigned");

        Ok(user)
    }

    async fn block_user(&self, actor: &CurrentUser, id: Uuid) -> AppResult<User> {
        require_manage(actor)?;

        if actor.id == id {
            return Err(AppError::validation("You cannot block your own account"));
        }

        let user = self.users.set_status(id, AccountStatus::Blocked).await?;
        let revoked = self.tokens.delete_for_user(id).await?;

        tracing::info!(user_id = %id, revoked_tokens = revoked, "Account blocked");

        Ok(user)
    }

    async fn unblock_user(&self, actor: &CurrentUser, id: Uuid) -> AppResult<User> {
        require_manage(actor)?;
        let user = self.users.set_status(id, AccountStatus::Active).await?;
        tracing::info!(user_id = %id, "Account unblocked");
        Ok(user)
    }

    async fn delete_user(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_manage(actor)?;

        if actor.id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        self.users.soft_delete(id, actor.id).await?;
        let revoked = self.tokens.delete_for_user(id).await?;

        tracing::info!(user_id = %id, revoked_tokens = revoked, "Account banned");

        Ok(())
    }
}
