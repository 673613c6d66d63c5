//! Partnership requests.
//!
//! Partnerships carry no geography, so review is a super-admin concern
//! and listing scopes to all-or-own.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::partnership::{NewPartnership, Partnership, PartnershipPatch};
use crate::domain::status::{PartnershipStatus, StatusFlow};
use crate::domain::{AuthorityScope, CurrentUser, EntityKind, Permission};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{PartnershipRepository, UserRepository};
use crate::jobs::Notifier;
use crate::types::{Paginated, PaginationParams};

use super::notify::notify_owner;

/// Fields for filing a partnership request.
#[derive(Debug, Clone)]
pub struct CreatePartnership {
    pub organization_name: String,
    pub organization_type: String,
    pub proposal: String,
    pub website: Option<String>,
}

#[async_trait]
pub trait PartnershipService: Send + Sync {
    /// File a request. A user may hold at most one open request.
    async fn create(
        &self,
        current: &CurrentUser,
        input: CreatePartnership,
    ) -> AppResult<Partnership>;

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<Partnership>;

    async fn list(
        &self,
        current: &CurrentUser,
        status: Option<PartnershipStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Partnership>>;

    /// Owner edit while the request is still pending.
    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        patch: PartnershipPatch,
    ) -> AppResult<Partnership>;

    /// Owner withdrawal while the request is still pending.
    async fn withdraw_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<()>;

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: PartnershipStatus,
    ) -> AppResult<Partnership>;

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
}

fn require_review(actor: &CurrentUser) -> AppResult<()> {
    if !actor.allows(Permission::ReviewPartnerships) {
        return Err(AppError::forbidden("You may not review partnership requests"));
    }
    Ok(())
}

/// Concrete implementation of [`PartnershipService`].
pub struct PartnershipManager {
    partnerships: Arc<dyn PartnershipRepository>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn Notifier>,
}

impl PartnershipManager {
    pub fn new(
        partnerships: Arc<dyn PartnershipRepository>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            partnerships,
            users,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<Partnership> {
        self.partnerships
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Partnership request"))
    }
}

#[async_trait]
impl PartnershipService for PartnershipManager {
    async fn create(
        &self,
        current: &CurrentUser,
        input: CreatePartnership,
    ) -> AppResult<Partnership> {
        if self
            .partnerships
            .find_open_for_user(current.id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Partnership request"));
        }

        let partnership = self
            .partnerships
            .create(NewPartnership {
                organization_name: input.organization_name,
                organization_type: input.organization_type,
                proposal: input.proposal,
                website: input.website,
                created_by: current.id,
            })
            .await?;

        tracing::info!(
            partnership_id = %partnership.id,
            organization = %partnership.organization_name,
            "Partnership request filed"
        );

        Ok(partnership)
    }

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<Partnership> {
        let partnership = self.load(id).await?;
        if partnership.created_by != current.id
            && !current.allows(Permission::ReviewPartnerships)
        {
            return Err(AppError::not_found("Partnership request"));
        }
        Ok(partnership)
    }

    async fn list(
        &self,
        current: &CurrentUser,
        status: Option<PartnershipStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Partnership>> {
        let scope = if current.allows(Permission::ReviewPartnerships) {
            AuthorityScope::All
        } else {
            AuthorityScope::Own(current.id)
        };

        let (partnerships, total) = self.partnerships.list(scope, status, &params).await?;
        Ok(Paginated::new(
            partnerships,
            params.page,
            params.limit(),
            total,
        ))
    }

    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        patch: PartnershipPatch,
    ) -> AppResult<Partnership> {
        let partnership = self.load(id).await?;

        if partnership.created_by != current.id {
            return Err(AppError::forbidden(
                "Only the requesting organization may edit this request",
            ));
        }
        if !partnership.status.editable_by_owner() {
            return Err(AppError::not_editable(partnership.status));
        }

        self.partnerships.update(id, patch).await
    }

    async fn withdraw_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<()> {
        let partnership = self.load(id).await?;

        if partnership.created_by != current.id {
            return Err(AppError::forbidden(
                "Only the requesting organization may withdraw this request",
            ));
        }
        if !partnership.status.editable_by_owner() {
            return Err(AppError::not_editable(partnership.status));
        }

        self.partnerships.soft_delete(id, current.id).await?;

        tracing::info!(partnership_id = %id, "Partnership request withdrawn");

        Ok(())
    }

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: PartnershipStatus,
    ) -> AppResult<Partnership> {
        require_review(actor)?;

        let partnership = self.load(id).await?;

        partnership.status.transition(to)?;

        let moved = self.partnerships.transition(id, partnership.status, to).await?;
        if !moved {
            return Err(AppError::invalid_transition(partnership.status, to));
        }

        if to.notifies_owner() {
            notify_owner(
                self.users.as_ref(),
                self.notifier.as_ref(),
                partnership.created_by,
                EntityKind::Partnership,
                &partnership.organization_name,
                to.as_str(),
            )
            .await;
        }

        tracing::info!(
            partnership_id = %id,
            from = %partnership.status,
            to = %to,
            "Partnership request transitioned"
        );

        self.load(id).await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_review(actor)?;

        self.load(id).await?;
        self.partnerships.soft_delete(id, actor.id).await?;

        tracing::info!(partnership_id = %id, "Partnership request deleted");

        Ok(())
    }
}
