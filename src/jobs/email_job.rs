//! Outbound email delivery.
//!
//! Services talk to the [`Notifier`] seam; deliveries are best-effort
//! and callers log failures instead of propagating them. In development
//! mode (no SMTP host configured), emails are logged. In production,
//! configure SMTP settings via environment variables.

use async_trait::async_trait;
use lettre::{
    message::header::ContentType, transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::{AppError, AppResult};
use crate::utils::EmailTemplate;

/// Rendered email payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// Email body content (plain text)
    pub body: String,
}

impl EmailJob {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Outbound notification dispatch.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipient: &str, template: EmailTemplate) -> AppResult<()>;
}

/// Email configuration from environment.
struct EmailConfig {
    smtp_host: Option<String>,
    smtp_port: u16,
    smtp_user: Option<String>,
    smtp_pass: Option<String>,
    smtp_from: String,
}

impl EmailConfig {
    fn from_env() -> Self {
        Self {
            smtp_host: env::var("SMTP_HOST").ok(),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_pass: env::var("SMTP_PASS").ok(),
            smtp_from: env::var("SMTP_FROM").unwrap_or_else(|_| "noreply@example.com".to_string()),
        }
    }

    fn is_configured(&self) -> bool {
        self.smtp_host.is_some()
    }
}

/// Notifier backed by SMTP, falling back to log output when SMTP is not
/// configured.
#[derive(Clone, Default)]
pub struct EmailNotifier;

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, recipient: &str, template: EmailTemplate) -> AppResult<()> {
        deliver(template.render(recipient)).await
    }
}

async fn deliver(email: EmailJob) -> AppResult<()> {
    let config = EmailConfig::from_env();

    if !config.is_configured() {
        // Development mode: log the email instead of sending
        tracing::info!(
            "=== EMAIL (not sent) ===\n\
             From: {}\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            config.smtp_from,
            email.to,
            email.subject,
            email.body
        );
        return Ok(());
    }

    let message = Message::builder()
        .from(parse_mailbox(&config.smtp_from)?)
        .to(parse_mailbox(&email.to)?)
        .subject(&email.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| AppError::internal(format!("Failed to build email: {}", e)))?;

    let host = config.smtp_host.unwrap_or_default();
    let mut transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&host)
        .map_err(|e| AppError::internal(format!("SMTP relay error: {}", e)))?
        .port(config.smtp_port);

    if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_pass) {
        transport = transport.credentials(Credentials::new(user, pass));
    }

    transport
        .build()
        .send(message)
        .await
        .map_err(|e| AppError::internal(format!("Failed to send email: {}", e)))?;

    tracing::info!(to = %email.to, subject = %email.subject, "Email delivered");
    Ok(())
}

fn parse_mailbox(address: &str) -> AppResult<lettre::message::Mailbox> {
    address
        .parse()
        .map_err(|e| AppError::internal(format!("Invalid email address {}: {}", address, e)))
}
