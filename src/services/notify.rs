//! Owner notification helper shared by the lifecycle services.
//!
//! Dispatch is best-effort: a missing owner or a failed send is logged
//! and swallowed, never surfaced to the caller who triggered the
//! transition.

use uuid::Uuid;

use crate::domain::EntityKind;
use crate::infra::repositories::UserRepository;
use crate::jobs::Notifier;
use crate::utils::EmailTemplate;

/// Email the owner of an entity about a status change.
pub(crate) async fn notify_owner(
    users: &dyn UserRepository,
    notifier: &dyn Notifier,
    owner_id: Uuid,
    entity: EntityKind,
    title: &str,
    status: &str,
) {
    let recipient = match users.find_by_id(owner_id).await {
        Ok(Some(user)) => user.email,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(owner = %owner_id, "Owner lookup for notification failed: {}", e);
            return;
        }
    };

    let template = EmailTemplate::StatusUpdate {
        entity,
        title: title.to_string(),
        status: status.to_string(),
    };

    if let Err(e) = notifier.notify(&recipient, template).await {
        tracing::warn!(recipient = %recipient, "Email dispatch failed: {}", e);
    }
}

/// Email an arbitrary recipient, swallowing failures.
pub(crate) async fn send_best_effort(
    notifier: &dyn Notifier,
    recipient: &str,
    template: EmailTemplate,
) {
    if let Err(e) = notifier.notify(recipient, template).await {
        tracing::warn!(recipient = %recipient, "Email dispatch failed: {}", e);
    }
}
