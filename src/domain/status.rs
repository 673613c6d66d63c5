//! Lifecycle status machines.
//!
//! Every reviewable entity carries a status column that may only move
//! along a fixed transition graph. The graphs live here as data on the
//! enums; services enforce them through [`transition`](StatusFlow::transition)
//! and the repositories re-check the expected source status inside the
//! UPDATE itself so concurrent reviewers cannot both win.
//!
//! Terminal states have no outgoing edges, so nothing can re-enter or
//! leave them.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::{AppError, AppResult};

/// Common surface of all status machines.
pub trait StatusFlow: Sized + Copy + Eq + std::fmt::Display + 'static {
    /// Status assigned on creation.
    fn initial() -> Self;

    /// Statuses directly reachable from `self`.
    fn next_states(&self) -> &'static [Self];

    /// A state with no outgoing edges can never change again.
    fn is_terminal(&self) -> bool {
        self.next_states().is_empty()
    }

    fn can_transition_to(&self, next: Self) -> bool {
        self.next_states().contains(&next)
    }

    /// Validate a requested move, returning the target on success.
    fn transition(self, next: Self) -> AppResult<Self> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::invalid_transition(self, next))
        }
    }
}

macro_rules! status_strings {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(AppError::validation(format!(
                        "unknown {} status: {other}",
                        stringify!($name),
                    ))),
                }
            }
        }
    };
}

/// Citizen report lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Open,
    InProgress,
    Resolved,
    Cancelled,
}

status_strings!(ReportStatus {
    Pending => "pending",
    Open => "open",
    InProgress => "in_progress",
    Resolved => "resolved",
    Cancelled => "cancelled",
});

impl StatusFlow for ReportStatus {
    fn initial() -> Self {
        ReportStatus::Pending
    }

    fn next_states(&self) -> &'static [Self] {
        match self {
            ReportStatus::Pending => &[ReportStatus::Open, ReportStatus::Cancelled],
            ReportStatus::Open => &[ReportStatus::InProgress],
            ReportStatus::InProgress => &[ReportStatus::Resolved],
            ReportStatus::Resolved | ReportStatus::Cancelled => &[],
        }
    }
}

impl ReportStatus {
    /// Owners may edit or cancel a report only before staff pick it up.
    pub fn editable_by_owner(&self) -> bool {
        matches!(self, ReportStatus::Pending)
    }

    /// Transitions that push a status-update notification to the owner.
    pub fn notifies_owner(&self) -> bool {
        matches!(self, ReportStatus::InProgress | ReportStatus::Resolved)
    }
}

/// Shared lifecycle of service orders and customer orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Reviewed,
    Accepted,
    InProgress,
    Completed,
    Rejected,
    Cancelled,
}

status_strings!(OrderStatus {
    Pending => "pending",
    Reviewed => "reviewed",
    Accepted => "accepted",
    InProgress => "in_progress",
    Completed => "completed",
    Rejected => "rejected",
    Cancelled => "cancelled",
});

impl StatusFlow for OrderStatus {
    fn initial() -> Self {
        OrderStatus::Pending
    }

    fn next_states(&self) -> &'static [Self] {
        match self {
            OrderStatus::Pending => &[
                OrderStatus::Reviewed,
                OrderStatus::Rejected,
                OrderStatus::Cancelled,
            ],
            OrderStatus::Reviewed => &[
                OrderStatus::Accepted,
                OrderStatus::Rejected,
                OrderStatus::Cancelled,
            ],
            OrderStatus::Accepted => &[
                OrderStatus::InProgress,
                OrderStatus::Rejected,
                OrderStatus::Cancelled,
            ],
            OrderStatus::InProgress => &[
                OrderStatus::Completed,
                OrderStatus::Rejected,
                OrderStatus::Cancelled,
            ],
            OrderStatus::Completed | OrderStatus::Rejected | OrderStatus::Cancelled => &[],
        }
    }
}

impl OrderStatus {
    pub fn editable_by_owner(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Reviewed)
    }

    pub fn notifies_owner(&self) -> bool {
        matches!(
            self,
            OrderStatus::Accepted
                | OrderStatus::InProgress
                | OrderStatus::Completed
                | OrderStatus::Rejected
        )
    }
}

/// Job application lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Interviewed,
    Hired,
    Rejected,
}

status_strings!(ApplicationStatus {
    Applied => "applied",
    Interviewed => "interviewed",
    Hired => "hired",
    Rejected => "rejected",
});

impl StatusFlow for ApplicationStatus {
    fn initial() -> Self {
        ApplicationStatus::Applied
    }

    fn next_states(&self) -> &'static [Self] {
        match self {
            ApplicationStatus::Applied => {
                &[ApplicationStatus::Interviewed, ApplicationStatus::Rejected]
            }
            ApplicationStatus::Interviewed => &[ApplicationStatus::Hired],
            ApplicationStatus::Hired | ApplicationStatus::Rejected => &[],
        }
    }
}

impl ApplicationStatus {
    /// Applicants may replace their submission only before screening starts.
    pub fn editable_by_owner(&self) -> bool {
        matches!(self, ApplicationStatus::Applied)
    }

    pub fn notifies_owner(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Interviewed | ApplicationStatus::Hired | ApplicationStatus::Rejected
        )
    }
}

/// Partnership request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartnershipStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

status_strings!(PartnershipStatus {
    Pending => "pending",
    Reviewed => "reviewed",
    Accepted => "accepted",
    Rejected => "rejected",
});

impl StatusFlow for PartnershipStatus {
    fn initial() -> Self {
        PartnershipStatus::Pending
    }

    fn next_states(&self) -> &'static [Self] {
        match self {
            PartnershipStatus::Pending => &[PartnershipStatus::Reviewed],
            PartnershipStatus::Reviewed => {
                &[PartnershipStatus::Accepted, PartnershipStatus::Rejected]
            }
            PartnershipStatus::Accepted | PartnershipStatus::Rejected => &[],
        }
    }
}

impl PartnershipStatus {
    pub fn editable_by_owner(&self) -> bool {
        matches!(self, PartnershipStatus::Pending)
    }

    pub fn notifies_owner(&self) -> bool {
        matches!(self, PartnershipStatus::Accepted | PartnershipStatus::Rejected)
    }

    /// An open request blocks the same user from filing another one.
    pub fn blocks_duplicate(&self) -> bool {
        !self.is_terminal()
    }
}

/// Agent request lifecycle. Approval promotes the requesting account to
/// the agent role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

status_strings!(AgentStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
    Cancelled => "cancelled",
});

impl StatusFlow for AgentStatus {
    fn initial() -> Self {
        AgentStatus::Pending
    }

    fn next_states(&self) -> &'static [Self] {
        match self {
            AgentStatus::Pending => &[
                AgentStatus::Approved,
                AgentStatus::Rejected,
                AgentStatus::Cancelled,
            ],
            AgentStatus::Approved | AgentStatus::Rejected | AgentStatus::Cancelled => &[],
        }
    }
}

impl AgentStatus {
    pub fn editable_by_owner(&self) -> bool {
        matches!(self, AgentStatus::Pending)
    }

    pub fn notifies_owner(&self) -> bool {
        matches!(self, AgentStatus::Approved | AgentStatus::Rejected)
    }

    pub fn blocks_duplicate(&self) -> bool {
        !self.is_terminal()
    }
}

/// Job postings are either accepting applications or closed. Not a
/// reviewed lifecycle, just an on/off switch flipped by admins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Closed,
}

status_strings!(JobStatus {
    Open => "open",
    Closed => "closed",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_follows_linear_path() {
        assert_eq!(ReportStatus::initial(), ReportStatus::Pending);
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Open));
        assert!(ReportStatus::Open.can_transition_to(ReportStatus::InProgress));
        assert!(ReportStatus::InProgress.can_transition_to(ReportStatus::Resolved));
        // No skipping stages
        assert!(!ReportStatus::Pending.can_transition_to(ReportStatus::Resolved));
        assert!(!ReportStatus::Open.can_transition_to(ReportStatus::Resolved));
    }

    #[test]
    fn report_cancel_only_from_pending() {
        assert!(ReportStatus::Pending.can_transition_to(ReportStatus::Cancelled));
        assert!(!ReportStatus::Open.can_transition_to(ReportStatus::Cancelled));
        assert!(!ReportStatus::InProgress.can_transition_to(ReportStatus::Cancelled));
    }

    #[test]
    fn terminal_states_reject_every_move() {
        for terminal in [ReportStatus::Resolved, ReportStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for next in [
                ReportStatus::Pending,
                ReportStatus::Open,
                ReportStatus::InProgress,
                ReportStatus::Resolved,
                ReportStatus::Cancelled,
            ] {
                assert!(terminal.transition(next).is_err());
            }
        }
    }

    #[test]
    fn order_rejects_and_cancels_from_any_active_state() {
        for active in [
            OrderStatus::Pending,
            OrderStatus::Reviewed,
            OrderStatus::Accepted,
            OrderStatus::InProgress,
        ] {
            assert!(active.can_transition_to(OrderStatus::Rejected));
            assert!(active.can_transition_to(OrderStatus::Cancelled));
        }
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn order_owner_window_closes_after_review_stage() {
        assert!(OrderStatus::Pending.editable_by_owner());
        assert!(OrderStatus::Reviewed.editable_by_owner());
        assert!(!OrderStatus::Accepted.editable_by_owner());
        assert!(!OrderStatus::InProgress.editable_by_owner());
    }

    #[test]
    fn application_rejection_happens_at_screening() {
        assert!(ApplicationStatus::Applied.can_transition_to(ApplicationStatus::Rejected));
        assert!(ApplicationStatus::Applied.can_transition_to(ApplicationStatus::Interviewed));
        assert!(ApplicationStatus::Interviewed.can_transition_to(ApplicationStatus::Hired));
        assert!(!ApplicationStatus::Interviewed.can_transition_to(ApplicationStatus::Rejected));
    }

    #[test]
    fn partnership_decision_requires_review_first() {
        assert!(!PartnershipStatus::Pending.can_transition_to(PartnershipStatus::Accepted));
        assert!(PartnershipStatus::Pending.can_transition_to(PartnershipStatus::Reviewed));
        assert!(PartnershipStatus::Reviewed.can_transition_to(PartnershipStatus::Accepted));
        assert!(PartnershipStatus::Reviewed.can_transition_to(PartnershipStatus::Rejected));
    }

    #[test]
    fn agent_request_is_single_step() {
        for next in [
            AgentStatus::Approved,
            AgentStatus::Rejected,
            AgentStatus::Cancelled,
        ] {
            assert_eq!(AgentStatus::Pending.transition(next).unwrap(), next);
            assert!(next.is_terminal());
        }
    }

    #[test]
    fn open_request_blocks_duplicates_until_terminal() {
        assert!(PartnershipStatus::Pending.blocks_duplicate());
        assert!(PartnershipStatus::Reviewed.blocks_duplicate());
        assert!(!PartnershipStatus::Accepted.blocks_duplicate());
        assert!(AgentStatus::Pending.blocks_duplicate());
        assert!(!AgentStatus::Cancelled.blocks_duplicate());
    }

    #[test]
    fn invalid_transition_reports_both_states() {
        let err = ReportStatus::Resolved
            .transition(ReportStatus::Open)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("resolved"));
        assert!(msg.contains("open"));
    }

    #[test]
    fn status_strings_round_trip() {
        assert_eq!("in_progress".parse::<OrderStatus>().unwrap(), OrderStatus::InProgress);
        assert_eq!(OrderStatus::InProgress.as_str(), "in_progress");
        assert!("unknown".parse::<ReportStatus>().is_err());
    }
}
