//! User feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;

/// Feedback categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Complaint,
    Suggestion,
    Compliment,
    Other,
}

impl FeedbackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Complaint => "complaint",
            FeedbackKind::Suggestion => "suggestion",
            FeedbackKind::Compliment => "compliment",
            FeedbackKind::Other => "other",
        }
    }
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeedbackKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complaint" => Ok(FeedbackKind::Complaint),
            "suggestion" => Ok(FeedbackKind::Suggestion),
            "compliment" => Ok(FeedbackKind::Compliment),
            "other" => Ok(FeedbackKind::Other),
            other => Err(AppError::validation(format!("unknown feedback kind: {other}"))),
        }
    }
}

/// A piece of feedback left by a signed-in user. Exact resubmissions of
/// the same email, kind and message are rejected as duplicates.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    pub id: Uuid,
    pub email: String,
    pub kind: FeedbackKind,
    pub message: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}
