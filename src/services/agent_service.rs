//! Agent requests.
//!
//! A user asks to serve as a field agent for a specific woreda.
//! Approval is the one transition with a side effect: the requesting
//! account is promoted to the agent role, bound to the request's
//! geography.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::agent::{AgentRequest, AgentRequestPatch, NewAgentRequest};
use crate::domain::status::{AgentStatus, StatusFlow};
use crate::domain::{AuthorityScope, CurrentUser, EntityKind, Permission, Role};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{AgentRequestRepository, GeographyRepository, UserRepository};
use crate::jobs::Notifier;
use crate::types::{Paginated, PaginationParams};
use crate::utils::EmailTemplate;

use super::geography_service::validate_chain;
use super::notify::{notify_owner, send_best_effort};

/// Fields for filing an agent request. The full geography chain is
/// mandatory.
#[derive(Debug, Clone)]
pub struct CreateAgentRequest {
    pub region_id: Uuid,
    pub zone_id: Uuid,
    pub woreda_id: Uuid,
    pub motivation: String,
}

#[async_trait]
pub trait AgentService: Send + Sync {
    /// File a request. A user may hold at most one open request.
    async fn create(
        &self,
        current: &CurrentUser,
        input: CreateAgentRequest,
    ) -> AppResult<AgentRequest>;

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<AgentRequest>;

    async fn list(
        &self,
        current: &CurrentUser,
        status: Option<AgentStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<AgentRequest>>;

    /// Owner edit while the request is still pending.
    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        patch: AgentRequestPatch,
    ) -> AppResult<AgentRequest>;

    /// Owner cancel while the request is still pending.
    async fn cancel_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<AgentRequest>;

    /// Reviewer decision. Approval promotes the requesting account to
    /// the agent role for the request's woreda.
    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: AgentStatus,
    ) -> AppResult<AgentRequest>;

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()>;
}

fn require_review(actor: &CurrentUser) -> AppResult<()> {
    if !actor.allows(Permission::ReviewAgents) {
        return Err(AppError::forbidden("You may not review agent requests"));
    }
    Ok(())
}

/// Concrete implementation of [`AgentService`].
pub struct AgentRequestManager {
    requests: Arc<dyn AgentRequestRepository>,
    users: Arc<dyn UserRepository>,
    geography: Arc<dyn GeographyRepository>,
    notifier: Arc<dyn Notifier>,
}

impl AgentRequestManager {
    pub fn new(
        requests: Arc<dyn AgentRequestRepository>,
        users: Arc<dyn UserRepository>,
        geography: Arc<dyn GeographyRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            requests,
            users,
            geography,
            notifier,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<AgentRequest> {
        self.requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Agent request"))
    }

    /// Woreda name for the status email; falls back when the woreda was
    /// removed after the request was filed.
    async fn woreda_name(&self, woreda_id: Uuid) -> String {
        match self.geography.find_woreda(woreda_id).await {
            Ok(Some(woreda)) => woreda.name,
            _ => "your woreda".to_string(),
        }
    }

    /// Promote the requesting account and tell them. The promotion must
    /// land; the email is best-effort.
    async fn promote(&self, request: &AgentRequest) -> AppResult<()> {
        let user = self
            .users
            .assign_role(
                request.created_by,
                Role::Agent,
                Some(request.region_id),
                Some(request.zone_id),
                Some(request.woreda_id),
            )
            .await?;

        tracing::info!(
            user_id = %user.id,
            woreda_id = %request.woreda_id,
            "Account promoted to agent"
        );

        send_best_effort(
            self.notifier.as_ref(),
            &user.email,
            EmailTemplate::AgentApproved { name: user.name },
        )
        .await;

        Ok(())
    }
}

#[async_trait]
impl AgentService for AgentRequestManager {
    async fn create(
        &self,
        current: &CurrentUser,
        input: CreateAgentRequest,
    ) -> AppResult<AgentRequest> {
        validate_chain(
            self.geography.as_ref(),
            Some(input.region_id),
            Some(input.zone_id),
            Some(input.woreda_id),
        )
        .await?;

        if self.requests.find_open_for_user(current.id).await?.is_some() {
            return Err(AppError::conflict("Agent request"));
        }

        let request = self
            .requests
            .create(NewAgentRequest {
                region_id: input.region_id,
                zone_id: input.zone_id,
                woreda_id: input.woreda_id,
                motivation: input.motivation,
                created_by: current.id,
            })
            .await?;

        tracing::info!(request_id = %request.id, "Agent request filed");

        Ok(request)
    }

    async fn get(&self, current: &CurrentUser, id: Uuid) -> AppResult<AgentRequest> {
        let request = self.load(id).await?;
        if request.created_by != current.id && !current.allows(Permission::ReviewAgents) {
            return Err(AppError::not_found("Agent request"));
        }
        Ok(request)
    }

    async fn list(
        &self,
        current: &CurrentUser,
        status: Option<AgentStatus>,
        params: PaginationParams,
    ) -> AppResult<Paginated<AgentRequest>> {
        let scope = if current.allows(Permission::ReviewAgents) {
            AuthorityScope::All
        } else {
            AuthorityScope::Own(current.id)
        };

        let (requests, total) = self.requests.list(scope, status, &params).await?;
        Ok(Paginated::new(requests, params.page, params.limit(), total))
    }

    async fn update_own(
        &self,
        current: &CurrentUser,
        id: Uuid,
        patch: AgentRequestPatch,
    ) -> AppResult<AgentRequest> {
        let request = self.load(id).await?;

        if request.created_by != current.id {
            return Err(AppError::forbidden(
                "Only the requester may edit this request",
            ));
        }
        if !request.status.editable_by_owner() {
            return Err(AppError::not_editable(request.status));
        }

        // Geography edits must leave a coherent chain behind.
        if patch.region_id.is_some() || patch.zone_id.is_some() || patch.woreda_id.is_some() {
            validate_chain(
                self.geography.as_ref(),
                Some(patch.region_id.unwrap_or(request.region_id)),
                Some(patch.zone_id.unwrap_or(request.zone_id)),
                Some(patch.woreda_id.unwrap_or(request.woreda_id)),
            )
            .await?;
        }

        self.requests.update(id, patch).await
    }

    async fn cancel_own(&self, current: &CurrentUser, id: Uuid) -> AppResult<AgentRequest> {
        let request = self.load(id).await?;

        if request.created_by != current.id {
            return Err(AppError::forbidden(
                "Only the requester may cancel this request",
            ));
        }
        if !request.status.editable_by_owner() {
            return Err(AppError::not_editable(request.status));
        }

        let moved = self
            .requests
            .transition(id, request.status, AgentStatus::Cancelled)
            .await?;
        if !moved {
            return Err(AppError::invalid_transition(
                request.status,
                AgentStatus::Cancelled,
            ));
        }

        self.load(id).await
    }

    async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        to: AgentStatus,
    ) -> AppResult<AgentRequest> {
        require_review(actor)?;

        let request = self.load(id).await?;

        request.status.transition(to)?;

        let moved = self.requests.transition(id, request.status, to).await?;
        if !moved {
            return Err(AppError::invalid_transition(request.status, to));
        }

        match to {
            AgentStatus::Approved => self.promote(&request).await?,
            _ if to.notifies_owner() => {
                let title = self.woreda_name(request.woreda_id).await;
                notify_owner(
                    self.users.as_ref(),
                    self.notifier.as_ref(),
                    request.created_by,
                    EntityKind::AgentRequest,
                    &title,
                    to.as_str(),
                )
                .await;
            }
            _ => {}
        }

        tracing::info!(
            request_id = %id,
            from = %request.status,
            to = %to,
            "Agent request transitioned"
        );

        self.load(id).await
    }

    async fn delete(&self, actor: &CurrentUser, id: Uuid) -> AppResult<()> {
        require_review(actor)?;

        self.load(id).await?;
        self.requests.soft_delete(id, actor.id).await?;

        tracing::info!(request_id = %id, "Agent request deleted");

        Ok(())
    }
}
