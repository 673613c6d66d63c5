//! Outbound delivery jobs.

pub mod email_job;

pub use email_job::{EmailJob, EmailNotifier, Notifier};

#[cfg(any(test, feature = "test-utils"))]
pub use email_job::MockNotifier;
