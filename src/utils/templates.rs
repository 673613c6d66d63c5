//! Email templates.
//!
//! Every outbound email is rendered here so wording stays in one place.

use crate::config::OTP_TTL_SECONDS;
use crate::domain::EntityKind;
use crate::jobs::EmailJob;

/// The emails this platform sends.
#[derive(Debug, Clone, PartialEq)]
pub enum EmailTemplate {
    /// Verification code for a registration in progress.
    OtpCode { name: String, code: String },
    /// Sent once after a registration is verified.
    Welcome { name: String },
    /// A submission the recipient owns changed status.
    StatusUpdate {
        entity: EntityKind,
        title: String,
        status: String,
    },
    /// Agent request approved; the account now carries the agent role.
    AgentApproved { name: String },
}

impl EmailTemplate {
    pub fn subject(&self) -> String {
        match self {
            EmailTemplate::OtpCode { .. } => "Your Hulegeb verification code".to_string(),
            EmailTemplate::Welcome { .. } => "Welcome to Hulegeb".to_string(),
            EmailTemplate::StatusUpdate { entity, status, .. } => {
                format!("Your {} is now {}", entity.display_name(), status)
            }
            EmailTemplate::AgentApproved { .. } => {
                "Your agent request has been approved".to_string()
            }
        }
    }

    pub fn body(&self) -> String {
        match self {
            EmailTemplate::OtpCode { name, code } => format!(
                "Hello {},\n\n\
                 Your verification code is: {}\n\n\
                 The code expires in {} minutes. If you did not request it,\n\
                 you can ignore this email.\n\n\
                 The Hulegeb team",
                name,
                code,
                OTP_TTL_SECONDS / 60
            ),
            EmailTemplate::Welcome { name } => format!(
                "Hello {},\n\n\
                 Your account has been verified. You can now sign in and\n\
                 submit reports, orders and requests.\n\n\
                 The Hulegeb team",
                name
            ),
            EmailTemplate::StatusUpdate {
                entity,
                title,
                status,
            } => format!(
                "Hello,\n\n\
                 Your {} \"{}\" has moved to status: {}.\n\n\
                 Sign in to see the details.\n\n\
                 The Hulegeb team",
                entity.display_name(),
                title,
                status
            ),
            EmailTemplate::AgentApproved { name } => format!(
                "Hello {},\n\n\
                 Your request to serve as an agent has been approved and your\n\
                 account now carries the agent role for your woreda.\n\n\
                 The Hulegeb team",
                name
            ),
        }
    }

    /// Render this template into a deliverable email.
    pub fn render(&self, to: &str) -> EmailJob {
        EmailJob::new(to, self.subject(), self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_body_contains_code_and_expiry() {
        let email = EmailTemplate::OtpCode {
            name: "Abebe".to_string(),
            code: "493817".to_string(),
        }
        .render("abebe@example.et");

        assert_eq!(email.to, "abebe@example.et");
        assert!(email.body.contains("493817"));
        assert!(email.body.contains("5 minutes"));
    }

    #[test]
    fn status_update_names_the_entity() {
        let email = EmailTemplate::StatusUpdate {
            entity: EntityKind::Report,
            title: "Broken streetlight".to_string(),
            status: "resolved".to_string(),
        }
        .render("user@example.et");

        assert_eq!(email.subject, "Your report is now resolved");
        assert!(email.body.contains("Broken streetlight"));
    }
}
