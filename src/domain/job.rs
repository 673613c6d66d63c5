//! Job postings and applications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::status::{ApplicationStatus, JobStatus};

/// An admin-published job posting. Applications are only accepted while
/// the posting is open and its deadline (if any) has not passed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub created_by: Uuid,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    #[serde(skip_serializing)]
    pub deleted_by: Option<Uuid>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Whether the posting currently accepts applications.
    pub fn accepts_applications(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Open
            && !self.is_deleted
            && self.deadline.map(|d| d > now).unwrap_or(true)
    }
}

/// A user's application against one posting. One application per
/// applicant email and job; the uploaded resume is removed from storage
/// when the application is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub created_by: Uuid,
    #[serde(skip_serializing)]
    pub is_deleted: bool,
    #[serde(skip_serializing)]
    pub deleted_by: Option<Uuid>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for publishing a new job posting.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub created_by: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<JobStatus>,
}

/// Fields for filing a new application.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub resume_url: String,
    pub cover_letter: Option<String>,
    pub created_by: Uuid,
}

/// Applicant-editable fields while the application is still at the
/// applied stage.
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub resume_url: Option<String>,
    pub cover_letter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn job(status: JobStatus, deadline: Option<DateTime<Utc>>) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            title: "Field coordinator".into(),
            description: "Coordinates field work".into(),
            requirements: None,
            location: None,
            deadline,
            status,
            created_by: Uuid::new_v4(),
            is_deleted: false,
            deleted_by: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn open_job_without_deadline_accepts_applications() {
        let now = Utc::now();
        assert!(job(JobStatus::Open, None).accepts_applications(now));
    }

    #[test]
    fn closed_or_expired_job_rejects_applications() {
        let now = Utc::now();
        assert!(!job(JobStatus::Closed, None).accepts_applications(now));
        assert!(!job(JobStatus::Open, Some(now - Duration::hours(1))).accepts_applications(now));
        assert!(job(JobStatus::Open, Some(now + Duration::hours(1))).accepts_applications(now));
    }
}
